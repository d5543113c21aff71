//! Byte frequency counting and the composite table key.
//!
//! A [`TableUnit`] packs one byte value and its frequency into a single
//! `u64`: the value in the low 8 bits, the frequency in the high 56 bits.
//! Sorting units as plain integers therefore orders them by frequency first
//! and by byte value among equal frequencies. The encoder and the decoder
//! both build their tree from units in that order, so the tie-break is part
//! of the container format.

use crate::error::Result;
use crate::stream::ByteStream;

/// Number of distinct byte values.
pub const SYMBOLS: usize = 256;

/// Smallest table the tree builder accepts.
pub const MIN_TABLE_SIZE: usize = 2;

/// Chunk size for the counting pass.
const READ_CHUNK: usize = 8192;

/// Composite sort key: frequency in the high 56 bits, byte value in the low 8.
///
/// This is also the on-disk representation of a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableUnit(u64);

impl TableUnit {
    /// Pack a byte value and its frequency.
    ///
    /// Frequencies above 2^56 - 1 don't fit and lose their top bits.
    pub fn new(value: u8, weight: u64) -> Self {
        Self((weight << 8) | value as u64)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn value(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn weight(self) -> u64 {
        self.0 >> 8
    }

    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }
}

/// Occurrence count of each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOLS],
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; SYMBOLS],
        }
    }

    /// Count the bytes of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add(data);
        table
    }

    /// Count every byte of `input`, then rewind it for the encoding pass.
    pub fn from_stream<S: ByteStream + ?Sized>(input: &mut S) -> Result<Self> {
        let mut table = Self::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = input.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            table.add(&chunk[..n]);
        }
        input.rewind()?;
        Ok(table)
    }

    /// Accumulate counts for `data`.
    pub fn add(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// Sum of all counts, i.e. the number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values that occurred at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// All 256 slots as composite units, sorted ascending.
    pub fn sorted_units(&self) -> [TableUnit; SYMBOLS] {
        let mut units = [TableUnit(0); SYMBOLS];
        for (value, unit) in units.iter_mut().enumerate() {
            *unit = TableUnit::new(value as u8, self.counts[value]);
        }
        units.sort_unstable();
        units
    }

    /// The sorted units the encoder builds its tree from.
    ///
    /// Leading zero-frequency slots are skipped, but at least
    /// [`MIN_TABLE_SIZE`] units are always kept. An input with fewer than two
    /// distinct bytes is padded with the highest-sorting zero slots, so the
    /// tree always has an internal root and every code is at least one bit.
    pub fn encoding_window(&self) -> Vec<TableUnit> {
        let units = self.sorted_units();
        let first_used = units
            .iter()
            .position(|unit| unit.weight() != 0)
            .unwrap_or(SYMBOLS);
        let start = first_used.min(SYMBOLS - MIN_TABLE_SIZE);
        units[start..].to_vec()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
