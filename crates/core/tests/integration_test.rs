//! Integration tests for the full huffpack pipeline.
//!
//! These tests verify end-to-end behavior: input -> count -> build tree ->
//! pack -> container -> parse -> rebuild tree -> walk -> output, with
//! verification that output matches input.

use huffpack_core::{
    codes::CodeTable,
    container::{decode, decode_bytes, encode, encode_bytes, Header, HEADER_SIZE, UNIT_SIZE},
    frequency::FrequencyTable,
    stream::{ByteStream, FileStream, MemStream},
    tree::HuffmanTree,
    Error, FormatError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn header_of(container: &[u8]) -> Header {
    Header::parse(&container[..HEADER_SIZE]).expect("valid header")
}

fn code_lengths(data: &[u8]) -> Vec<usize> {
    let window = FrequencyTable::from_bytes(data).encoding_window();
    let tree = HuffmanTree::build(&window).expect("tree");
    let codes = CodeTable::from_tree(&tree);
    let mut lengths: Vec<usize> = (0..=255u8)
        .filter(|&v| data.contains(&v))
        .map(|v| codes.get(v).expect("code").len())
        .collect();
    lengths.sort();
    lengths
}

/// Simple round-trip through memory streams.
#[test]
fn test_round_trip_text() {
    let input_data = b"hello world! this is a test of the full pipeline with some repetition: aaaaaaaaaa bbbbbbbbbb cccccccccc";

    let container = encode_bytes(input_data).expect("encode failed");
    let decoded = decode_bytes(&container).expect("decode failed");

    assert_eq!(decoded, input_data, "output doesn't match input");
}

/// Round-trip the edge-case inputs named by the format.
#[test]
fn test_round_trip_edge_cases() {
    let full_alphabet: Vec<u8> = (0..=255).collect();
    let cases: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0x00],
        vec![0xff],
        vec![0x41; 1000],
        full_alphabet.clone(),
        full_alphabet.repeat(17),
        b"ab".to_vec(),
    ];

    for input in cases {
        let container = encode_bytes(&input).expect("encode failed");
        assert_eq!(decode_bytes(&container).expect("decode failed"), input);
    }
}

/// Seeded random inputs of varying size and alphabet.
#[test]
fn test_round_trip_random() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let len = rng.gen_range(0..5000);
        let alphabet = rng.gen_range(1..=256u32);
        let input: Vec<u8> = (0..len).map(|_| rng.gen_range(0..alphabet) as u8).collect();

        let container = encode_bytes(&input).expect("encode failed");
        assert_eq!(decode_bytes(&container).expect("decode failed"), input);
    }
}

/// Header always records the input length and a table size in 2..=256.
#[test]
fn test_header_integrity() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for len in [0usize, 1, 2, 255, 256, 4096] {
        let input: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let container = encode_bytes(&input).unwrap();
        let header = header_of(&container);

        assert_eq!(header.file_size, len as u64);
        assert!((2..=256).contains(&header.table_size));
    }
}

/// A single repeated byte still produces a two-entry table.
#[test]
fn test_minimum_table_size() {
    let container = encode_bytes(&[0x41; 1000]).unwrap();
    assert_eq!(header_of(&container).table_size, 2);
}

/// Code lengths depend only on the frequency multiset.
#[test]
fn test_tie_break_determinism() {
    assert_eq!(code_lengths(b"AAABBB"), code_lengths(b"CCCDDD"));
    assert_eq!(
        code_lengths(b"xxxxyyzw"),
        code_lengths(b"\x01\x01\x01\x01\x90\x90\x02\xfe")
    );

    // Same input twice gives byte-identical containers
    let data = b"determinism matters for the wire format";
    assert_eq!(encode_bytes(data).unwrap(), encode_bytes(data).unwrap());
}

/// Wrong magic is a format error and writes nothing.
#[test]
fn test_magic_rejection() {
    let mut container = encode_bytes(b"magic test").unwrap();
    container[..8].copy_from_slice(b"NOTHUFF\0");

    let mut input = MemStream::from_vec(container);
    let mut output = MemStream::new();
    let result = decode(&mut input, &mut output);

    assert!(matches!(
        result,
        Err(Error::Format(FormatError::InvalidMagic { .. }))
    ));
    assert!(output.as_slice().is_empty());
}

/// Cutting the payload anywhere before the last symbol is detected.
#[test]
fn test_truncation_detection() {
    let input = b"The quick brown fox jumps over the lazy dog. ".repeat(20);
    let container = encode_bytes(&input).unwrap();
    let table_end = HEADER_SIZE + header_of(&container).table_size as usize * UNIT_SIZE;

    for cut in table_end..container.len() {
        let result = decode_bytes(&container[..cut]);
        assert!(
            matches!(result, Err(Error::TruncatedPayload { .. })),
            "cut at {cut} was not reported as truncated"
        );
    }
}

/// Truncating inside the header or table is a format error, not a panic.
#[test]
fn test_truncated_header_and_table() {
    let container = encode_bytes(b"short header").unwrap();
    let table_end = HEADER_SIZE + header_of(&container).table_size as usize * UNIT_SIZE;

    for cut in 0..table_end {
        assert!(matches!(
            decode_bytes(&container[..cut]),
            Err(Error::Format(_))
        ));
    }
}

/// The worked example: "aaab" packs into one payload byte.
#[test]
fn test_aaab_scenario() {
    let container = encode_bytes(b"aaab").unwrap();
    let header = header_of(&container);

    assert_eq!(header.file_size, 4);
    assert_eq!(header.table_size, 2);
    assert_eq!(container.len(), HEADER_SIZE + 2 * UNIT_SIZE + 1);
    assert_eq!(*container.last().unwrap(), 0b1110_0000);
    assert_eq!(decode_bytes(&container).unwrap(), b"aaab");
}

/// Encode and decode through real files.
#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("input.txt");
    let packed = dir.path().join("input.he");
    let restored = dir.path().join("input.hd");

    let data = b"file streams are rewound between the two encoding passes\n".repeat(200);
    std::fs::write(&original, &data).unwrap();

    let mut input = FileStream::open(&original).unwrap();
    let mut output = FileStream::create(&packed).unwrap();
    let summary = encode(&mut input, &mut output).unwrap();
    drop(output);

    assert_eq!(summary.file_size, data.len() as u64);
    assert_eq!(
        std::fs::metadata(&packed).unwrap().len(),
        summary.total_bytes()
    );

    let mut input = FileStream::open(&packed).unwrap();
    let mut output = FileStream::create(&restored).unwrap();
    decode(&mut input, &mut output).unwrap();
    drop(output);

    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

/// Large input that spans many internal buffers.
#[test]
fn test_large_data() {
    let mut rng = ChaCha8Rng::seed_from_u64(999);
    let mut input_data = vec![b'X'; 128 * 1024];
    for byte in input_data.iter_mut().step_by(7) {
        *byte = rng.gen_range(b'a'..=b'z');
    }

    let container = encode_bytes(&input_data).unwrap();
    assert!(container.len() < input_data.len());

    let decoded = decode_bytes(&container).unwrap();
    assert_eq!(decoded.len(), input_data.len());
    assert_eq!(decoded, input_data);
}

/// A stream that can't rewind can't be encoded.
#[test]
fn test_encode_requires_rewind() {
    struct OneShot(MemStream);

    impl ByteStream for OneShot {
        fn at_end(&mut self) -> std::io::Result<bool> {
            self.0.at_end()
        }
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.read(buf)
        }
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.write(buf)
        }
        fn rewind(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "one-shot"))
        }
    }

    let mut input = OneShot(MemStream::from_vec(b"data".to_vec()));
    let mut output = MemStream::new();
    assert!(matches!(
        encode(&mut input, &mut output),
        Err(Error::Io(_))
    ));
    assert!(output.as_slice().is_empty());
}
