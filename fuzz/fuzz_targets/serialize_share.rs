#![no_main]
use libfuzzer_sys::fuzz_target;

use prime_sss::Share;

fuzz_target!(|share: Share| {
    let data: Vec<u8> = (&share).into();
    assert_eq!(data.len(), share.serialized_len());
});
