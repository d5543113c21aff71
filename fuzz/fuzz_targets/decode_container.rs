#![no_main]

use huffpack_core::container::decode_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must be rejected with an error, never a panic
    let _ = decode_bytes(data);

    // Same, with a valid magic so the table and payload paths get exercised
    let mut framed = b"HUFFMAN\0".to_vec();
    framed.extend_from_slice(data);
    let _ = decode_bytes(&framed);
});
