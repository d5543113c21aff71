//! Container serialization: encode and decode whole streams.
//!
//! A container is self-describing. It carries the sorted frequency table
//! rather than an explicit tree shape, and the decoder rebuilds the exact
//! tree the encoder used with [`HuffmanTree::build`].
//!
//! # Container Format
//!
//! ```text
//! +---------------------+
//! | magic (8 bytes)     |  "HUFFMAN\0"
//! +---------------------+
//! | file_size (8)       |  u64 little-endian, decoded symbol count
//! +---------------------+
//! | table_size (4)      |  u32 little-endian, 2..=256
//! +---------------------+
//! | table               |  table_size x u64 composite units
//! | (table_size * 8)    |  (weight << 8 | value), ascending
//! +---------------------+
//! | payload             |  codes packed MSB-first,
//! | (variable)          |  final byte zero-padded
//! +---------------------+
//! ```
//!
//! The decoder stops after `file_size` symbols; bytes after the payload are
//! never read.

use std::io;

use log::{debug, info, log_enabled, trace, Level};

use crate::bitio::{BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::error::{Error, FormatError, Result};
use crate::frequency::{FrequencyTable, TableUnit, MIN_TABLE_SIZE, SYMBOLS};
use crate::stream::{ByteStream, MemStream};
use crate::tree::{HuffmanTree, Node};

/// Magic bytes at offset 0.
pub const MAGIC: [u8; 8] = *b"HUFFMAN\0";

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 20;

/// Size of one serialized table unit.
pub const UNIT_SIZE: usize = 8;

/// Chunk size for the packing pass and for buffered decoder output.
const IO_CHUNK: usize = 8192;

/// Fixed-size container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of symbols in the original input
    pub file_size: u64,
    /// Number of table units that follow the header
    pub table_size: u32,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..8].copy_from_slice(&MAGIC);
        bytes[8..16].copy_from_slice(&self.file_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.table_size.to_le_bytes());
        bytes
    }

    /// Parse and validate a header.
    ///
    /// # Errors
    /// - `FormatError::HeaderTooShort` if fewer than 20 bytes are given
    /// - `FormatError::InvalidMagic` if the magic doesn't match
    /// - `FormatError::TableSizeOutOfRange` if `table_size` is not in 2..=256
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::HeaderTooShort {
                required: HEADER_SIZE,
                actual: bytes.len(),
            }
            .into());
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[0..8]);
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic {
                expected: MAGIC,
                actual: magic,
            }
            .into());
        }

        let mut file_size = [0u8; 8];
        file_size.copy_from_slice(&bytes[8..16]);
        let mut table_size = [0u8; 4];
        table_size.copy_from_slice(&bytes[16..20]);

        let header = Header {
            file_size: u64::from_le_bytes(file_size),
            table_size: u32::from_le_bytes(table_size),
        };

        if !(MIN_TABLE_SIZE..=SYMBOLS).contains(&(header.table_size as usize)) {
            return Err(FormatError::TableSizeOutOfRange {
                size: header.table_size,
            }
            .into());
        }

        Ok(header)
    }

    fn read_from<S: ByteStream>(input: &mut S) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let n = input.read_full(&mut bytes)?;
        Self::parse(&bytes[..n])
    }
}

/// What an encode produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Input bytes encoded
    pub file_size: u64,
    /// Table units written
    pub table_size: usize,
    /// Bytes of packed payload
    pub payload_bytes: u64,
}

impl EncodeSummary {
    /// Size of the whole container.
    pub fn total_bytes(&self) -> u64 {
        (HEADER_SIZE + self.table_size * UNIT_SIZE) as u64 + self.payload_bytes
    }
}

/// What a decode consumed and produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Symbols written to the output
    pub file_size: u64,
    /// Table units read
    pub table_size: usize,
    /// Payload bytes consumed
    pub payload_bytes: u64,
}

impl DecodeSummary {
    /// Container bytes consumed, header and table included.
    pub fn total_bytes(&self) -> u64 {
        (HEADER_SIZE + self.table_size * UNIT_SIZE) as u64 + self.payload_bytes
    }
}

fn input_changed() -> Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        "input changed between counting and encoding passes",
    )
    .into()
}

/// Encode `input` into a container written to `output`.
///
/// Reads the input twice, so it must support [`ByteStream::rewind`].
pub fn encode<I: ByteStream, O: ByteStream>(
    input: &mut I,
    output: &mut O,
) -> Result<EncodeSummary> {
    let freqs = FrequencyTable::from_stream(input)?;
    let window = freqs.encoding_window();
    debug!(
        "using {} of {} table slots ({} distinct bytes)",
        window.len(),
        SYMBOLS,
        freqs.distinct()
    );

    let tree = HuffmanTree::build(&window)?;
    if log_enabled!(Level::Trace) {
        trace!("huffman tree:\n{}", tree.render());
    }

    let codes = CodeTable::from_tree(&tree);
    debug!("longest code is {} bits", codes.max_length());
    if log_enabled!(Level::Trace) {
        trace!("code table:\n{}", codes.render());
    }

    let header = Header {
        file_size: tree.root_weight(),
        table_size: window.len() as u32,
    };
    info!("file size = {}", header.file_size);
    info!("table size = {}", header.table_size);

    output.write_all(&header.to_bytes())?;
    let mut table = Vec::with_capacity(window.len() * UNIT_SIZE);
    for unit in &window {
        table.extend_from_slice(&unit.to_le_bytes());
    }
    output.write_all(&table)?;

    let mut writer = BitWriter::new(output);
    let mut chunk = vec![0u8; IO_CHUNK];
    let mut consumed = 0u64;
    loop {
        let n = input.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        for &byte in &chunk[..n] {
            let code = codes.get(byte).ok_or_else(input_changed)?;
            writer.write_code(code)?;
        }
        consumed += n as u64;
    }
    if consumed != header.file_size {
        return Err(input_changed());
    }

    let payload_bytes = writer.finish()?;
    output.flush()?;

    Ok(EncodeSummary {
        file_size: header.file_size,
        table_size: window.len(),
        payload_bytes,
    })
}

/// Check the invariants the tree builder relies on and that tie the table
/// to the header.
fn validate_table(units: &[TableUnit], file_size: u64) -> Result<()> {
    for (index, pair) in units.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            return Err(FormatError::UnsortedTable { index: index + 1 }.into());
        }
    }

    // At most 256 weights below 2^56 each, so the sum fits in u64
    let total: u64 = units.iter().map(|unit| unit.weight()).sum();
    if total != file_size {
        return Err(FormatError::SizeMismatch {
            header: file_size,
            table: total,
        }
        .into());
    }
    Ok(())
}

/// Decode a container from `input`, writing the original bytes to `output`.
///
/// The header and table are fully validated before anything is written.
/// A decode that fails part-way through the payload may already have
/// written some output; the caller must discard it.
pub fn decode<I: ByteStream, O: ByteStream>(
    input: &mut I,
    output: &mut O,
) -> Result<DecodeSummary> {
    let header = Header::read_from(input)?;
    let table_size = header.table_size as usize;

    let mut raw = vec![0u8; table_size * UNIT_SIZE];
    let n = input.read_full(&mut raw)?;
    if n < raw.len() {
        return Err(FormatError::TableTooShort {
            expected: table_size,
            actual: n / UNIT_SIZE,
        }
        .into());
    }

    let units: Vec<TableUnit> = raw
        .chunks_exact(UNIT_SIZE)
        .map(|chunk| {
            let mut bytes = [0u8; UNIT_SIZE];
            bytes.copy_from_slice(chunk);
            TableUnit::from_le_bytes(bytes)
        })
        .collect();
    validate_table(&units, header.file_size)?;

    let tree = HuffmanTree::build(&units)?;
    if log_enabled!(Level::Trace) {
        trace!("huffman tree:\n{}", tree.render());
    }
    info!("file size = {}", header.file_size);
    info!("table size = {}", header.table_size);

    let root = tree.root();
    let mut walk = root;
    let mut decoded = 0u64;
    let mut pending = Vec::with_capacity(IO_CHUNK);
    let mut reader = BitReader::new(input);

    while decoded < header.file_size {
        let bit = reader.read_bit()?.ok_or(Error::TruncatedPayload {
            decoded,
            expected: header.file_size,
        })?;

        // `walk` is never a leaf here: it resets to the root after each symbol
        if let Some(next) = tree.step(walk, bit) {
            walk = next;
        }

        if let Node::Leaf { value, .. } = *tree.node(walk) {
            pending.push(value);
            if pending.len() == IO_CHUNK {
                output.write_all(&pending)?;
                pending.clear();
            }
            walk = root;
            decoded += 1;
        }
    }

    let payload_bytes = reader.position().div_ceil(8);
    output.write_all(&pending)?;
    output.flush()?;

    debug!("decoded {} symbols from {} payload bytes", decoded, payload_bytes);

    Ok(DecodeSummary {
        file_size: decoded,
        table_size,
        payload_bytes,
    })
}

/// Encode an in-memory buffer into a container.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = MemStream::from(data);
    let mut output = MemStream::new();
    encode(&mut input, &mut output)?;
    Ok(output.into_inner())
}

/// Decode an in-memory container.
pub fn decode_bytes(container: &[u8]) -> Result<Vec<u8>> {
    let mut input = MemStream::from(container);
    let mut output = MemStream::new();
    decode(&mut input, &mut output)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_of(container: &[u8]) -> Header {
        Header::parse(&container[..HEADER_SIZE]).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let header = Header {
            file_size: 0x0102030405060708,
            table_size: 0x1234,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..8], b"HUFFMAN\0");
        assert_eq!(&bytes[8..16], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(&bytes[16..20], &[0x34, 0x12, 0, 0]);
    }

    #[test]
    fn test_header_parse_round_trip() {
        let header = Header {
            file_size: 99,
            table_size: 17,
        };
        assert_eq!(Header::parse(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn test_header_rejects_table_size_one() {
        let header = Header {
            file_size: 5,
            table_size: 1,
        };
        assert!(matches!(
            Header::parse(&header.to_bytes()),
            Err(Error::Format(FormatError::TableSizeOutOfRange { size: 1 }))
        ));
    }

    #[test]
    fn test_header_rejects_oversized_table() {
        let header = Header {
            file_size: 5,
            table_size: 257,
        };
        assert!(matches!(
            Header::parse(&header.to_bytes()),
            Err(Error::Format(FormatError::TableSizeOutOfRange { size: 257 }))
        ));
    }

    #[test]
    fn test_header_too_short() {
        assert!(matches!(
            Header::parse(&MAGIC),
            Err(Error::Format(FormatError::HeaderTooShort {
                required: HEADER_SIZE,
                actual: 8
            }))
        ));
    }

    #[test]
    fn test_aaab_exact_bytes() {
        let container = encode_bytes(b"aaab").unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"HUFFMAN\0");
        expected.extend_from_slice(&4u64.to_le_bytes());
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&TableUnit::new(b'b', 1).to_le_bytes());
        expected.extend_from_slice(&TableUnit::new(b'a', 3).to_le_bytes());
        // a = 1, b = 0: 1110 padded to 11100000
        expected.push(0b1110_0000);

        assert_eq!(container, expected);
        assert_eq!(decode_bytes(&container).unwrap(), b"aaab");
    }

    #[test]
    fn test_empty_input() {
        let container = encode_bytes(b"").unwrap();
        let header = header_of(&container);
        assert_eq!(header.file_size, 0);
        assert_eq!(header.table_size, 2);
        assert_eq!(container.len(), HEADER_SIZE + 2 * UNIT_SIZE);
        assert!(decode_bytes(&container).unwrap().is_empty());
    }

    #[test]
    fn test_single_repeated_byte() {
        let data = vec![0x41; 1000];
        let container = encode_bytes(&data).unwrap();
        let header = header_of(&container);
        assert_eq!(header.file_size, 1000);
        assert_eq!(header.table_size, 2);
        assert_eq!(container.len(), HEADER_SIZE + 2 * UNIT_SIZE + 125);
        assert_eq!(decode_bytes(&container).unwrap(), data);
    }

    #[test]
    fn test_encode_summary() {
        let mut input = MemStream::from(&b"hello world"[..]);
        let mut output = MemStream::new();
        let summary = encode(&mut input, &mut output).unwrap();

        assert_eq!(summary.file_size, 11);
        assert_eq!(summary.table_size, 8);
        assert_eq!(summary.total_bytes(), output.as_slice().len() as u64);
    }

    #[test]
    fn test_decode_summary() {
        let container = encode_bytes(b"hello world").unwrap();
        let mut input = MemStream::from_vec(container.clone());
        let mut output = MemStream::new();
        let summary = decode(&mut input, &mut output).unwrap();

        assert_eq!(summary.file_size, 11);
        assert_eq!(summary.total_bytes(), container.len() as u64);
    }

    #[test]
    fn test_bad_magic_writes_nothing() {
        let mut container = encode_bytes(b"some data").unwrap();
        container[0] = b'X';

        let mut input = MemStream::from_vec(container);
        let mut output = MemStream::new();
        let result = decode(&mut input, &mut output);

        assert!(matches!(result, Err(Error::Format(FormatError::InvalidMagic { .. }))));
        assert!(output.as_slice().is_empty());
    }

    #[test]
    fn test_truncated_table() {
        let container = encode_bytes(b"abcdef").unwrap();
        let cut = HEADER_SIZE + UNIT_SIZE * 3 + 4;
        assert!(matches!(
            decode_bytes(&container[..cut]),
            Err(Error::Format(FormatError::TableTooShort {
                expected: 6,
                actual: 3
            }))
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let container = encode_bytes(&data).unwrap();
        let cut = container.len() - 3;

        assert!(matches!(
            decode_bytes(&container[..cut]),
            Err(Error::TruncatedPayload { expected, .. }) if expected == data.len() as u64
        ));
    }

    #[test]
    fn test_unsorted_table_rejected() {
        let mut container = encode_bytes(b"aaab").unwrap();
        // Swap the two table units
        let first = HEADER_SIZE;
        let second = HEADER_SIZE + UNIT_SIZE;
        let (a, b) = container.split_at_mut(second);
        a[first..second].swap_with_slice(&mut b[..UNIT_SIZE]);

        assert!(matches!(
            decode_bytes(&container),
            Err(Error::Format(FormatError::UnsortedTable { index: 1 }))
        ));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut container = encode_bytes(b"aaab").unwrap();
        container[8..16].copy_from_slice(&5u64.to_le_bytes());

        assert!(matches!(
            decode_bytes(&container),
            Err(Error::Format(FormatError::SizeMismatch { header: 5, table: 4 }))
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut container = encode_bytes(b"trailing").unwrap();
        container.extend_from_slice(&[0xde, 0xad]);
        assert_eq!(decode_bytes(&container).unwrap(), b"trailing");
    }

    #[test]
    fn test_large_output_crosses_chunks() {
        let data: Vec<u8> = (0..IO_CHUNK * 3 + 7).map(|i| (i % 251) as u8).collect();
        let container = encode_bytes(&data).unwrap();
        assert_eq!(decode_bytes(&container).unwrap(), data);
    }
}
