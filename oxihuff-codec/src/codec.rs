//! The Huffman codec and the values it produces.

use crate::config::HuffmanConfig;
use crate::dictionary::Dictionary;
use crate::tree::CodeTree;
use oxihuff_core::bitstream::BitReader;
use oxihuff_core::traits::Symbol;
use std::fmt;

/// Shape of an encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Dictionary followed by a codeword payload.
    Huffman,
    /// A `0` bit followed by the original bytes.
    Passthrough,
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamMode::Huffman => write!(f, "huffman"),
            StreamMode::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Output of [`HuffmanCodec::encode`].
///
/// `bit_len` is the number of meaningful bits in `data`; the rest of the
/// last byte is zero padding and must not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    /// Stream bytes, zero-padded to a byte boundary.
    pub data: Vec<u8>,
    /// Valid bit length.
    pub bit_len: u64,
    /// Huffman or passthrough.
    pub mode: StreamMode,
}

impl EncodedStream {
    /// Stream size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the stream holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the stream is the passthrough form.
    pub fn is_passthrough(&self) -> bool {
        self.mode == StreamMode::Passthrough
    }

    /// Stream bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Move the stream into a reader limited to its valid bits.
    pub fn into_reader(self) -> BitReader<'static> {
        BitReader::from_vec(self.data).with_limit(self.bit_len)
    }
}

/// Statistics of the last encode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodeReport {
    /// Input size in bytes.
    pub input_bytes: u64,
    /// Encoded size in bytes.
    pub output_bytes: u64,
    /// Dictionary size in bits (zero for passthrough).
    pub dictionary_bits: u64,
    /// Payload size in bits (raw bits for passthrough).
    pub payload_bits: u64,
    /// Number of distinct symbols in the input.
    pub distinct_symbols: usize,
    /// Longest codeword length (zero for passthrough).
    pub max_code_length: u8,
    /// Mode of the emitted stream.
    pub mode: Option<StreamMode>,
}

impl EncodeReport {
    /// Encoded size divided by input size (1.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            1.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Byte-oriented Huffman compressor over `S`-sized symbols.
///
/// An instance owns the tree and dictionary of its last encode or decode;
/// the next call replaces them. Instances share no state, so independent
/// buffers can be processed on separate threads with one codec each.
///
/// # Example
///
/// ```rust
/// use oxihuff_codec::{HuffmanCodec, StreamMode};
///
/// let mut codec = HuffmanCodec::<u8>::default();
/// let stream = codec.encode(b"AAAAAAAAAB").unwrap();
/// assert_eq!(stream.mode, StreamMode::Huffman);
/// assert_eq!(stream.data, vec![0x82, 0x14, 0x1A, 0x11, 0xFF, 0x00]);
///
/// let decoded = codec.decode(&stream).unwrap();
/// assert_eq!(decoded, b"AAAAAAAAAB");
/// ```
#[derive(Debug, Clone)]
pub struct HuffmanCodec<S: Symbol = u8> {
    pub(crate) config: HuffmanConfig,
    pub(crate) tree: Option<CodeTree<S>>,
    pub(crate) dictionary: Option<Dictionary<S>>,
    pub(crate) report: EncodeReport,
}

impl<S: Symbol> HuffmanCodec<S> {
    /// Create a codec with the given configuration.
    pub fn new(config: HuffmanConfig) -> oxihuff_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tree: None,
            dictionary: None,
            report: EncodeReport::default(),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }

    /// Tree of the last cycle, if it used one.
    pub fn tree(&self) -> Option<&CodeTree<S>> {
        self.tree.as_ref()
    }

    /// Dictionary of the last cycle, if it used one.
    pub fn dictionary(&self) -> Option<&Dictionary<S>> {
        self.dictionary.as_ref()
    }

    /// Statistics of the last encode.
    pub fn last_report(&self) -> &EncodeReport {
        &self.report
    }

    /// Drop the state of the last cycle.
    pub fn reset(&mut self) {
        self.tree = None;
        self.dictionary = None;
        self.report = EncodeReport::default();
    }
}

impl<S: Symbol> Default for HuffmanCodec<S> {
    fn default() -> Self {
        Self {
            config: HuffmanConfig::DEFAULT,
            tree: None,
            dictionary: None,
            report: EncodeReport::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackMode;

    #[test]
    fn test_new_validates_config() {
        assert!(HuffmanCodec::<u8>::new(HuffmanConfig::new(0)).is_err());
        let codec = HuffmanCodec::<u16>::new(HuffmanConfig::STORE).unwrap();
        assert_eq!(codec.config().fallback, FallbackMode::Always);
        assert!(codec.tree().is_none());
    }

    #[test]
    fn test_report_ratio() {
        let report = EncodeReport {
            input_bytes: 200,
            output_bytes: 50,
            ..Default::default()
        };
        assert!((report.ratio() - 0.25).abs() < f64::EPSILON);
        assert!((EncodeReport::default().ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stream_into_reader_respects_bit_len() {
        let stream = EncodedStream {
            data: vec![0xFF],
            bit_len: 3,
            mode: StreamMode::Huffman,
        };
        let mut reader = stream.into_reader();
        assert_eq!(reader.remaining_bits(), 3);
        assert_eq!(reader.get(4), 0b1110);
    }

    #[test]
    fn test_reset() {
        let mut codec = HuffmanCodec::<u8>::default();
        codec.encode(b"hello hello hello").unwrap();
        assert!(codec.tree().is_some());
        codec.reset();
        assert!(codec.tree().is_none());
        assert!(codec.dictionary().is_none());
        assert_eq!(codec.last_report().input_bytes, 0);
    }
}
