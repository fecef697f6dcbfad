#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use prime_sss::{SecretSharing, Share};

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub threshold: u8,
    pub shares: Vec<Share>,
}

fuzz_target!(|params: Parameters| {
    if let Ok(sss) = SecretSharing::new(params.threshold as u32, params.threshold as u32) {
        let _secret = sss.decode(&params.shares);
    }
    let _secret = prime_sss::recover(&params.shares);
});
