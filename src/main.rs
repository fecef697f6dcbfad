use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use prime_sss::{io, SecretSharing};

/// prime-sss: split a file into Shamir shares over GF(65809), or put it back together.
///
/// Any K of the N share files recover the file; fewer reveal nothing about it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split FILE into N share files named FILE-ssA, FILE-ssB, ...
    Encode {
        /// File holding the secret
        file: PathBuf,

        /// Total number of shares N to create
        #[arg(short = 'n', long)]
        shares: u32,

        /// Threshold K, the minimum number of shares required to recover the file
        #[arg(short = 'k', long)]
        threshold: u32,

        /// Directory to write the share files into (defaults to FILE's directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Recover a file from share files and write it to OUTPUT
    Decode {
        /// Where to write the recovered secret
        output: PathBuf,

        /// Share files produced by `encode`
        #[arg(required = true)]
        shares: Vec<PathBuf>,

        /// Threshold K used at encode time. Without it every given share is used, and
        /// fewer than K shares silently produce a wrong file.
        #[arg(short = 'k', long)]
        threshold: Option<u32>,
    },
}

const ENCODE_FAILED: u8 = 3;
const DECODE_FAILED: u8 = 4;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn encode(file: PathBuf, n: u32, k: u32, out_dir: Option<PathBuf>) -> Result<()> {
    let sss = SecretSharing::new(n, k)?;
    let written = io::encode_file(&sss, &file, out_dir.as_deref())
        .with_context(|| format!("encode {:?}", file))?;

    for path in &written {
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn decode(output: PathBuf, shares: Vec<PathBuf>, k: Option<u32>) -> Result<()> {
    // Decoding only needs the threshold, so any valid share count will do.
    let sss = k
        .map(|k| SecretSharing::new(k, k))
        .transpose()
        .context("invalid threshold")?;

    let len = io::decode_files(sss.as_ref(), &output, &shares)
        .with_context(|| format!("decode {} share files", shares.len()))?;

    eprintln!("  recovered {len} bytes into {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (result, code) = match cli.command {
        Command::Encode {
            file,
            shares,
            threshold,
            out_dir,
        } => (encode(file, shares, threshold, out_dir), ENCODE_FAILED),
        Command::Decode {
            output,
            shares,
            threshold,
        } => (decode(output, shares, threshold), DECODE_FAILED),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(code)
        }
    }
}
