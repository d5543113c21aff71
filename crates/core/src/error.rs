//! Error types for the huffpack codec.
//!
//! Every encode and decode returns a structured error rather than panicking.
//! Nothing is retried internally: a failed run reports exactly what went
//! wrong and the caller decides what to do with any partial output.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - I/O: the underlying byte stream failed to open, read or write
/// - Format: the container header or table is malformed
/// - Truncated payload: the bit stream ended before every symbol was decoded
/// - Allocation: storage for the tree could not be obtained
#[derive(Debug, Error)]
pub enum Error {
    /// Byte stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container header or frequency table is invalid
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Payload ran out of bits before `expected` symbols were produced
    #[error("truncated payload: decoded {decoded} of {expected} symbols")]
    TruncatedPayload { decoded: u64, expected: u64 },

    /// Tree arena or working storage could not be reserved
    #[error("allocation failure: could not reserve {nodes} tree nodes")]
    AllocationFailure { nodes: usize },
}

/// Container format errors.
///
/// All of these are detected while parsing the header and table, before a
/// single output byte is written.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Magic bytes at offset 0 don't match
    #[error("invalid magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 8], actual: [u8; 8] },

    /// Input ended inside the fixed-size header
    #[error("header too short: need {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    /// `table_size` outside 2..=256
    #[error("table size {size} outside valid range 2..=256")]
    TableSizeOutOfRange { size: u32 },

    /// Input ended inside the frequency table
    #[error("table too short: header declares {expected} entries, got {actual}")]
    TableTooShort { expected: usize, actual: usize },

    /// Table entries are not in strictly ascending composite-key order
    #[error("table entry {index} is not in ascending order")]
    UnsortedTable { index: usize },

    /// Total table weight disagrees with `file_size`
    #[error("header declares {header} symbols but table weights sum to {table}")]
    SizeMismatch { header: u64, table: u64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
