//! Code table generation.
//!
//! Walks a [`HuffmanTree`] depth-first with an explicit stack, appending a 0
//! for every left edge and a 1 for every right edge. The path at each leaf is
//! that byte value's code. Only the encoder needs a code table; the decoder
//! walks the tree directly.

use std::fmt;
use std::fmt::Write as _;

use crate::frequency::SYMBOLS;
use crate::tree::{HuffmanTree, Node};

/// Longest possible code: a fully skewed tree over 256 leaves.
pub const MAX_CODE_LEN: usize = SYMBOLS - 1;

/// A bit string of up to [`MAX_CODE_LEN`] bits, stored MSB-first.
///
/// Bit `i` of the code lives at bit `63 - i % 64` of word `i / 64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    words: [u64; 4],
    len: u8,
}

impl Code {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at position `index` (0 = first bit emitted).
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < self.len());
        (self.words[index / 64] >> (63 - index % 64)) & 1 == 1
    }

    /// This code extended by one bit.
    pub fn with_bit(mut self, bit: bool) -> Self {
        debug_assert!(self.len() < MAX_CODE_LEN);
        let index = self.len();
        if bit {
            self.words[index / 64] |= 1 << (63 - index % 64);
        }
        self.len += 1;
        self
    }

    /// The code as `(value, bit_count)` pairs of at most 64 bits each,
    /// right-aligned for [`BitWriter::write_bits`](crate::bitio::BitWriter::write_bits).
    pub fn words(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        let len = self.len();
        (0..len.div_ceil(64)).map(move |w| {
            let count = (len - w * 64).min(64);
            (self.words[w] >> (64 - count), count)
        })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_char(if self.bit(i) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Code assigned to each byte value by one tree.
///
/// Built fresh for every encode and dropped with it.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: [Code; SYMBOLS],
}

impl CodeTable {
    /// Assign a code to every leaf of `tree`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = [Code::default(); SYMBOLS];
        let mut stack = vec![(tree.root(), Code::default())];

        while let Some((id, code)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { value, .. } => codes[value as usize] = code,
                Node::Internal { left, right, .. } => {
                    stack.push((right, code.with_bit(true)));
                    stack.push((left, code.with_bit(false)));
                }
            }
        }

        Self { codes }
    }

    /// Code for `value`, or `None` if the tree has no leaf for it.
    pub fn get(&self, value: u8) -> Option<&Code> {
        let code = &self.codes[value as usize];
        (!code.is_empty()).then_some(code)
    }

    /// Number of byte values with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_length(&self) -> usize {
        self.codes.iter().map(Code::len).max().unwrap_or(0)
    }

    /// One line per assigned code: `value = v, length = n code = 0101`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (value, code) in self.codes.iter().enumerate() {
            if !code.is_empty() {
                let _ = writeln!(
                    out,
                    "value = {}, length = {} code = {}",
                    value,
                    code.len(),
                    code
                );
            }
        }
        out
    }
}
