#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use prime_sss::SecretSharing;

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub threshold: u8,
    pub n_shares: u8,
    pub secret: Vec<u8>,
}

fuzz_target!(|params: Parameters| {
    let Ok(sss) = SecretSharing::new(params.n_shares as u32, params.threshold as u32) else {
        return;
    };
    let shares = sss.encode(&params.secret).unwrap();
    let k = params.threshold as usize;
    assert_eq!(sss.decode(&shares[shares.len() - k..]).unwrap(), params.secret);
});
