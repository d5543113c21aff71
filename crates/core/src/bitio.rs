//! Bit-level I/O over byte streams.
//!
//! [`BitWriter`] packs Huffman codes into bytes and [`BitReader`] walks them
//! back out one bit at a time. Both operate MSB-first: the first bit of a
//! code lands in bit 7 of its byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: cannot tell padding from data; the decoder stops after
//!   `file_size` symbols instead
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//! use huffpack_core::stream::{ByteStream, MemStream};
//!
//! let mut sink = MemStream::new();
//! let mut writer = BitWriter::new(&mut sink);
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! // Total: 10111 -> padded to 10111000
//! assert_eq!(writer.finish().unwrap(), 1);
//! assert_eq!(sink.as_slice(), &[0b1011_1000]);
//!
//! sink.rewind().unwrap();
//! let mut reader = BitReader::new(&mut sink);
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! assert_eq!(reader.read_bit().unwrap(), Some(false));
//! ```

use crate::codes::Code;
use crate::error::Result;
use crate::stream::ByteStream;

/// Bytes buffered before a write to, or after a read from, the stream.
const BLOCK_SIZE: usize = 4096;

/// Writes bits MSB-first into a [`ByteStream`].
///
/// Completed bytes collect in a block buffer that is flushed to the sink
/// whenever it fills, and once more by [`BitWriter::finish`].
///
/// # Invariants
/// - `bit_count` is always < 8
/// - unused low bits of `bit_buffer` are zero
pub struct BitWriter<'a, S: ByteStream> {
    sink: &'a mut S,
    /// Completed bytes not yet handed to the sink
    block: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Bytes already handed to the sink
    flushed: u64,
}

impl<'a, S: ByteStream> BitWriter<'a, S> {
    /// Create a writer that appends to `sink` at its current position.
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            block: Vec::with_capacity(BLOCK_SIZE),
            bit_buffer: 0,
            bit_count: 0,
            flushed: 0,
        }
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// `count` must be at most 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        debug_assert!(count <= 64, "write_bits takes at most 64 bits");

        let mut remaining = count;
        let mut val = value;

        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Extract the top bits_to_write bits of what's left
            let shift = remaining - bits_to_write;
            let bits = ((val >> shift) & ((1 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.push_byte(self.bit_buffer)?;
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            // shift < 64 since at least one bit was written
            val &= (1u64 << shift) - 1;
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Append every bit of a Huffman code.
    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for (word, count) in code.words() {
            self.write_bits(word, count)?;
        }
        Ok(())
    }

    /// Total number of bits written so far, including the partial byte.
    pub fn bit_len(&self) -> u64 {
        (self.flushed + self.block.len() as u64) * 8 + self.bit_count as u64
    }

    /// Pad the final byte with zeros, flush everything to the sink and
    /// return the number of bytes written.
    pub fn finish(mut self) -> Result<u64> {
        if self.bit_count > 0 {
            let last = self.bit_buffer;
            self.push_byte(last)?;
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        self.flush_block()?;
        Ok(self.flushed)
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.block.push(byte);
        if self.block.len() == BLOCK_SIZE {
            self.flush_block()?;
        }
        Ok(())
    }

    fn flush_block(&mut self) -> Result<()> {
        if !self.block.is_empty() {
            self.sink.write_all(&self.block)?;
            self.flushed += self.block.len() as u64;
            self.block.clear();
        }
        Ok(())
    }
}

/// Reads bits MSB-first from a [`ByteStream`].
///
/// Refills a block buffer from the source as needed and serves one cached
/// byte at a time, so a single decoded bit never costs a stream call.
pub struct BitReader<'a, S: ByteStream> {
    source: &'a mut S,
    block: Vec<u8>,
    /// Valid bytes in `block`
    filled: usize,
    /// Next unread byte in `block`
    pos: usize,
    /// Byte currently being consumed
    cache: u8,
    /// Unconsumed bits left in `cache` (0-8)
    cache_bits: u8,
    /// Total bits handed out
    bits_read: u64,
}

impl<'a, S: ByteStream> BitReader<'a, S> {
    /// Create a reader starting at the source's current position.
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            block: vec![0; BLOCK_SIZE],
            filled: 0,
            pos: 0,
            cache: 0,
            cache_bits: 0,
            bits_read: 0,
        }
    }

    /// Read one bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.cache_bits == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.cache = byte;
                    self.cache_bits = 8;
                }
                None => return Ok(None),
            }
        }

        self.cache_bits -= 1;
        self.bits_read += 1;
        Ok(Some((self.cache >> self.cache_bits) & 1 == 1))
    }

    /// Number of bits returned by [`BitReader::read_bit`] so far.
    pub fn position(&self) -> u64 {
        self.bits_read
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.pos == self.filled {
            self.filled = self.source.read(&mut self.block)?;
            self.pos = 0;
            if self.filled == 0 {
                return Ok(None);
            }
        }
        let byte = self.block[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}
