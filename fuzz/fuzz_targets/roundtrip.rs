#![no_main]

use huffpack_core::container::{decode_bytes, encode_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let packed = encode_bytes(data).expect("in-memory encode cannot fail");
    assert_eq!(decode_bytes(&packed).expect("decode of fresh container"), data);
});
