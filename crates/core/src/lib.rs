//! huffpack-core: static Huffman compression over byte streams
//!
//! This library provides a lossless, order-0 Huffman compressor that:
//! - Counts the 256 byte frequencies of an input in one pass
//! - Builds a deterministic Huffman tree from the sorted frequency table
//! - Packs codes MSB-first into a self-describing container
//! - Rebuilds the identical tree from the container to decode
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `stream`: Byte stream contract over files, stdio and memory
//! - `bitio`: Bit reading/writing on top of byte streams
//! - `frequency`: Frequency counting and composite table keys
//! - `tree`: Arena-backed Huffman tree builder
//! - `codes`: Code table generation
//! - `container`: Header/table serialization, encode and decode
//! - `metrics`: Observable run statistics
//!
//! # Example
//!
//! ```
//! use huffpack_core::container::{decode_bytes, encode_bytes};
//!
//! let packed = encode_bytes(b"aaab").unwrap();
//! assert_eq!(decode_bytes(&packed).unwrap(), b"aaab");
//! ```

pub mod bitio;
pub mod codes;
pub mod container;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod stream;
pub mod tree;

// Re-export commonly used types
pub use container::{decode, decode_bytes, encode, encode_bytes, DecodeSummary, EncodeSummary};
pub use error::{Error, FormatError, Result};
pub use stream::{ByteStream, FileStream, MemStream};
