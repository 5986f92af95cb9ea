//! Core traits shared by the codec and its front ends.
//!
//! - [`Symbol`]: a fixed-width unit of the input alphabet (`KEY_BITS` wide).
//! - [`Compressor`] / [`Decompressor`]: whole-buffer compression, the seam the
//!   CLI and other callers program against.

use crate::error::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// A fixed-width symbol of the input alphabet.
///
/// Symbols are read from and written to bit streams `BITS` bits at a time,
/// MSB-first. The alphabet holds `2^BITS` symbols.
pub trait Symbol: Copy + Ord + Hash + Debug + Send + Sync + 'static {
    /// Width of one symbol in bits (`KEY_BITS`).
    const BITS: u8;

    /// Number of distinct symbols in the alphabet.
    const ALPHABET_SIZE: usize = 1 << Self::BITS;

    /// Build a symbol from the low `BITS` bits of `bits`.
    fn from_bits(bits: u32) -> Self;

    /// The symbol's value as an integer.
    fn to_bits(self) -> u32;

    /// Dense index of the symbol in `0..ALPHABET_SIZE`.
    #[inline]
    fn index(self) -> usize {
        self.to_bits() as usize
    }
}

impl Symbol for u8 {
    const BITS: u8 = 8;

    #[inline]
    fn from_bits(bits: u32) -> Self {
        bits as u8
    }

    #[inline]
    fn to_bits(self) -> u32 {
        u32::from(self)
    }
}

impl Symbol for u16 {
    const BITS: u8 = 16;

    #[inline]
    fn from_bits(bits: u32) -> Self {
        bits as u16
    }

    #[inline]
    fn to_bits(self) -> u32 {
        u32::from(self)
    }
}

/// A whole-buffer compressor.
///
/// The full input is materialized in memory; there is no incremental mode.
pub trait Compressor {
    /// Compress `input` into a self-contained byte buffer.
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

/// A whole-buffer decompressor.
pub trait Decompressor {
    /// Decompress a buffer produced by the matching [`Compressor`].
    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}
