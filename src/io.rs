//! Moving secrets and shares to and from the filesystem.
//!
//! Share files are named after the secret they came from: `notes.txt` yields
//! `notes.txt-ssA`, `notes.txt-ssB`, and so on. Past the 26th share the
//! letter is replaced by the share index (`notes.txt-ss27`).

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::{recover_bytes, Error, SecretSharing, Share};

/// File name of the share at 0-based `position` for the secret at `secret`.
pub fn share_file_name(secret: &Path, position: usize) -> OsString {
    let mut name = secret
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("secret"));

    name.push("-ss");
    match u8::try_from(position) {
        Ok(p) if p < 26 => name.push(char::from(b'A' + p).to_string()),
        _ => name.push((position + 1).to_string()),
    }
    name
}

/// Writes one file per share next to `secret`, or into `out_dir` when given.
/// Returns the paths written, in share order.
pub fn write_shares(
    secret: &Path,
    out_dir: Option<&Path>,
    shares: &[Share],
) -> Result<Vec<PathBuf>, Error> {
    let dir = match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        None => secret.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let mut written = Vec::with_capacity(shares.len());
    for (position, share) in shares.iter().enumerate() {
        let path = dir.join(share_file_name(secret, position));
        fs::write(&path, Vec::from(share))?;
        info!("wrote share {} to {}", share.index, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Reads every share file in full.
pub fn read_share_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Vec<u8>>, Error> {
    paths
        .iter()
        .map(|p| fs::read(p.as_ref()).map_err(Error::from))
        .collect()
}

/// Splits the file at `secret` and writes its shares. See [`write_shares`].
pub fn encode_file(
    sss: &SecretSharing,
    secret: &Path,
    out_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, Error> {
    let data = zeroize_on_drop(fs::read(secret)?);
    let shares = sss.encode(&data)?;
    write_shares(secret, out_dir, &shares)
}

/// Recovers a secret from share files and writes it to `output`.
///
/// With `sss` the threshold is enforced (see [`SecretSharing::decode`]);
/// without it every file is used as one equation (see [`crate::recover`]).
/// Nothing is written unless recovery succeeds. Returns the secret length.
pub fn decode_files<P: AsRef<Path>>(
    sss: Option<&SecretSharing>,
    output: &Path,
    shares: &[P],
) -> Result<usize, Error> {
    let buffers = read_share_files(shares)?;
    let secret = zeroize_on_drop(match sss {
        Some(sss) => sss.decode_bytes(&buffers)?,
        None => recover_bytes(&buffers)?,
    });

    fs::write(output, &*secret)?;
    info!("wrote {} byte secret to {}", secret.len(), output.display());
    Ok(secret.len())
}

#[cfg(feature = "zeroize_memory")]
fn zeroize_on_drop(data: Vec<u8>) -> zeroize::Zeroizing<Vec<u8>> {
    zeroize::Zeroizing::new(data)
}

#[cfg(not(feature = "zeroize_memory"))]
fn zeroize_on_drop(data: Vec<u8>) -> Vec<u8> {
    data
}

#[cfg(test)]
mod tests {
    use super::{decode_files, encode_file, read_share_files, share_file_name, write_shares};
    use crate::{Error, SecretSharing, Share};
    use std::fs;
    use std::path::Path;

    #[test]
    fn share_file_names() {
        let secret = Path::new("/tmp/data/notes.txt");
        assert_eq!(share_file_name(secret, 0), "notes.txt-ssA");
        assert_eq!(share_file_name(secret, 4), "notes.txt-ssE");
        assert_eq!(share_file_name(secret, 25), "notes.txt-ssZ");
        assert_eq!(share_file_name(secret, 26), "notes.txt-ss27");
        assert_eq!(share_file_name(secret, 300), "notes.txt-ss301");
    }

    #[test]
    fn encode_then_decode_files() {
        let dir = tempfile::tempdir().unwrap();
        let secret_path = dir.path().join("secret.bin");
        let secret: Vec<u8> = (0..=255).rev().collect();
        fs::write(&secret_path, &secret).unwrap();

        let sss = SecretSharing::new(5, 3).unwrap();
        let written = encode_file(&sss, &secret_path, None).unwrap();
        assert_eq!(written.len(), 5);
        assert_eq!(written[1], dir.path().join("secret.bin-ssB"));
        for path in &written {
            assert_eq!(fs::metadata(path).unwrap().len(), 4 + 4 * 256);
        }

        let output = dir.path().join("recovered.bin");
        let len = decode_files(Some(&sss), &output, &[&written[4], &written[0], &written[2]])
            .unwrap();
        assert_eq!(len, 256);
        assert_eq!(fs::read(&output).unwrap(), secret);

        let output = dir.path().join("recovered-permissive.bin");
        decode_files(None, &output, &written[1..4]).unwrap();
        assert_eq!(fs::read(&output).unwrap(), secret);
    }

    #[test]
    fn shares_go_to_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("shares");
        let sss = SecretSharing::new(2, 2).unwrap();
        let shares = sss.encode(b"abc").unwrap();

        let written = write_shares(Path::new("input/abc.txt"), Some(&out_dir), &shares).unwrap();
        assert_eq!(written[0], out_dir.join("abc.txt-ssA"));

        let buffers = read_share_files(&written).unwrap();
        let parsed: Vec<Share> = buffers
            .iter()
            .map(|b| Share::try_from(b.as_slice()).unwrap())
            .collect();
        assert_eq!(parsed, shares);
    }

    #[test]
    fn mismatched_share_files_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sss = SecretSharing::new(3, 2).unwrap();
        let long = write_shares(&dir.path().join("long"), None, &sss.encode(b"long").unwrap()).unwrap();
        let short = write_shares(&dir.path().join("short"), None, &sss.encode(b"sh").unwrap()).unwrap();

        let output = dir.path().join("out");
        let result = decode_files(Some(&sss), &output, &[&long[0], &short[1]]);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn missing_share_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope-ssA");
        let result = decode_files(None, &dir.path().join("out"), &[missing]);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
