//! # OxiHuff Core
//!
//! Core components for the OxiHuff compressor.
//!
//! This crate provides the fundamental building blocks the codec is made of:
//!
//! - [`bitstream`]: MSB-first bit-level I/O over in-memory buffers
//! - [`traits`]: the [`Symbol`] alphabet trait and whole-buffer codec traits
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Front end                                           │
//! │     oxihuff CLI                                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     OXHF frame (magic, version, original length)       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Frequency table, code tree, dictionary, payload    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitBuffer, BitReader/BitWriter                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.put(12, 0xABC);
//! writer.flush();
//! let bytes = writer.into_bytes();
//! assert_eq!(bytes, vec![0xAB, 0xC0]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.get(12), 0xABC);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitBuffer, BitReader, BitWriter};
pub use error::{OxiHuffError, Result};
pub use traits::{Compressor, Decompressor, Symbol};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitBuffer, BitReader, BitWriter};
    pub use crate::error::{OxiHuffError, Result};
    pub use crate::traits::{Compressor, Decompressor, Symbol};
}
