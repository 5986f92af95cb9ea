//! # OxiHuff Codec
//!
//! Pure Rust Huffman compression with a self-describing, bit-packed
//! dictionary.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Self-describing**: the code table travels in the stream as grouped
//!   `(symbol, codeword)` records, so no out-of-band state is needed
//! - **Passthrough fallback**: incompressible input is stored verbatim behind
//!   a single `0` bit
//! - **Deterministic**: equal frequencies are broken by symbol value, so the
//!   same input always produces the same bytes
//! - **Bounded codes**: codewords never exceed 15 bits
//! - **Wide symbols**: 8-bit (default) or 16-bit alphabets
//!
//! ## Stream format
//!
//! MSB-first and bit-contiguous, with only the final byte zero-padded:
//!
//! ```text
//! stream      = dictionary payload | 1'b0 raw-bytes
//! dictionary  = group+ 1'b0
//! group       = 1'b1 count:7 length:4 count × (symbol:KEY_BITS codeword:length)
//! payload     = codeword of every input symbol, in order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_codec::{compress, decompress};
//!
//! let original = b"abracadabra abracadabra abracadabra";
//! let compressed = compress(original).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! Working with raw streams instead of frames:
//!
//! ```rust
//! use oxihuff_codec::HuffmanCodec;
//!
//! let mut codec = HuffmanCodec::<u8>::default();
//! let stream = codec.encode(b"mississippi mississippi").unwrap();
//! println!("{}", codec.dictionary().unwrap());
//!
//! let decoded = codec.decode(&stream).unwrap();
//! assert_eq!(decoded, b"mississippi mississippi");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod codec;
pub mod config;
mod decode;
pub mod dictionary;
mod encode;
pub mod frame;
pub mod frequency;
pub mod tree;

pub use codec::{EncodeReport, EncodedStream, HuffmanCodec, StreamMode};
pub use config::{FallbackMode, HuffmanConfig, MAX_CODE_LENGTH};
pub use dictionary::{Codeword, Dictionary, HeaderRecord};
pub use frame::{FrameHeader, compress_frame, decompress_frame, read_frame};
pub use frequency::FrequencyTable;
pub use oxihuff_core::error::{OxiHuffError, Result};
pub use oxihuff_core::traits::{Compressor, Decompressor, Symbol};
pub use tree::{CodeTree, NodeId};

/// Compress bytes into an OXHF frame with the default configuration.
///
/// # Example
///
/// ```rust
/// use oxihuff_codec::compress;
///
/// let data = vec![b'x'; 1000];
/// let compressed = compress(&data).unwrap();
/// assert!(compressed.len() < data.len());
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_config(data, HuffmanConfig::DEFAULT)
}

/// Compress bytes into an OXHF frame with the given configuration.
///
/// Uses 8-bit symbols; build a `HuffmanCodec<u16>` for 16-bit ones.
pub fn compress_with_config(data: &[u8], config: HuffmanConfig) -> Result<Vec<u8>> {
    let mut codec = HuffmanCodec::<u8>::new(config)?;
    compress_frame(&mut codec, data)
}

/// Decompress an OXHF frame of 8-bit symbols.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut codec = HuffmanCodec::<u8>::default();
    decompress_frame(&mut codec, data)
}

/// Compress independent buffers in parallel, one frame per buffer.
///
/// Each buffer gets its own codec, so results are identical to calling
/// [`compress_with_config`] on each buffer in turn.
#[cfg(feature = "parallel")]
pub fn compress_batch(inputs: &[&[u8]], config: HuffmanConfig) -> Result<Vec<Vec<u8>>> {
    compress_batch_with(inputs, config, |_| {})
}

/// Like [`compress_batch`], calling `on_frame(index)` from the worker thread
/// as soon as buffer `index` has been coded.
#[cfg(feature = "parallel")]
pub fn compress_batch_with<F>(
    inputs: &[&[u8]],
    config: HuffmanConfig,
    on_frame: F,
) -> Result<Vec<Vec<u8>>>
where
    F: Fn(usize) + Sync,
{
    use rayon::prelude::*;

    config.validate()?;
    inputs
        .par_iter()
        .enumerate()
        .map(|(index, input)| {
            let frame = compress_with_config(input, config)?;
            on_frame(index);
            Ok(frame)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let data = b"the quick brown fox jumps over the lazy dog, the end".repeat(4);
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_compress_store() {
        let compressed = compress_with_config(b"stored", HuffmanConfig::STORE).unwrap();
        let header = FrameHeader::parse(&compressed).unwrap();
        assert_eq!(header.mode, StreamMode::Passthrough);
        assert_eq!(decompress(&compressed).unwrap(), b"stored");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_compress_batch_matches_sequential() {
        let a = vec![b'a'; 300];
        let b = b"hello parallel world".to_vec();
        let inputs: Vec<&[u8]> = vec![a.as_slice(), b.as_slice(), &[]];
        let frames = compress_batch(&inputs, HuffmanConfig::DEFAULT).unwrap();
        assert_eq!(frames.len(), 3);
        for (frame, input) in frames.iter().zip(&inputs) {
            assert_eq!(frame, &compress(input).unwrap());
            assert_eq!(decompress(frame).unwrap(), *input);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_compress_batch_reports_each_frame() {
        use std::sync::Mutex;

        let texts: Vec<Vec<u8>> = (0..8).map(|i| format!("buffer {i} ").repeat(i + 1).into_bytes()).collect();
        let inputs: Vec<&[u8]> = texts.iter().map(Vec::as_slice).collect();
        let done = Mutex::new(Vec::new());

        let frames = compress_batch_with(&inputs, HuffmanConfig::DEFAULT, |index| {
            done.lock().unwrap().push(index);
        })
        .unwrap();

        let mut done = done.into_inner().unwrap();
        done.sort_unstable();
        assert_eq!(done, (0..8).collect::<Vec<_>>());
        assert_eq!(frames.len(), 8);
    }
}
