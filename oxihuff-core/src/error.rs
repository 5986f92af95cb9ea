//! Error types for OxiHuff operations.
//!
//! The bit-level primitives never fail: reading past the end of a buffer
//! yields zero bits. The errors below are raised by the codec and container
//! layers, which bound every read by an explicitly tracked valid bit length.

use std::io;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum OxiHuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in a frame header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Frame written by an unknown format version.
    #[error("Unsupported frame version: {version}")]
    UnsupportedVersion {
        /// Version byte found in the header.
        version: u8,
    },

    /// Frame symbol width does not match the decoder.
    #[error("Symbol width mismatch: stream uses {found}-bit symbols, decoder expects {expected}")]
    SymbolWidthMismatch {
        /// Symbol width of the decoder.
        expected: u8,
        /// Symbol width recorded in the stream.
        found: u8,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Input length is not a whole number of symbols.
    #[error("Input of {bits} bits is not a multiple of the {symbol_bits}-bit symbol width")]
    UnalignedInput {
        /// Input length in bits.
        bits: u64,
        /// Symbol width in bits.
        symbol_bits: u8,
    },

    /// No prefix code within the length limit exists for the alphabet.
    #[error("Cannot build a prefix code for {symbols} symbols within {max_length} bits")]
    CodeLengthOverflow {
        /// Number of distinct symbols.
        symbols: usize,
        /// Maximum codeword length allowed.
        max_length: u8,
    },

    /// Dictionary section ended before a record or entry was complete.
    #[error("Truncated dictionary at bit position {bit_position}")]
    TruncatedDictionary {
        /// Bit position where the read would have crossed the valid range.
        bit_position: u64,
    },

    /// Dictionary entries describe an impossible tree.
    #[error("Invalid dictionary: {message}")]
    InvalidDictionary {
        /// Description of the conflict.
        message: String,
    },

    /// Invalid Huffman code encountered during decoding.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// Valid bit range ended inside a codeword.
    #[error("Truncated payload at bit position {bit_position}")]
    TruncatedPayload {
        /// Bit position where the stream ended.
        bit_position: u64,
    },

    /// Corrupted data in a frame.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Decoded length differs from the recorded original length.
    #[error("Length mismatch: expected {expected} bytes, decoded {actual}")]
    LengthMismatch {
        /// Length recorded in the frame.
        expected: u64,
        /// Length actually decoded.
        actual: u64,
    },

    /// Unexpected end of file.
    #[error("Unexpected end of file: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, OxiHuffError>;

impl OxiHuffError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unaligned input error.
    pub fn unaligned_input(bits: u64, symbol_bits: u8) -> Self {
        Self::UnalignedInput { bits, symbol_bits }
    }

    /// Create a code length overflow error.
    pub fn code_length_overflow(symbols: usize, max_length: u8) -> Self {
        Self::CodeLengthOverflow {
            symbols,
            max_length,
        }
    }

    /// Create a truncated dictionary error.
    pub fn truncated_dictionary(bit_position: u64) -> Self {
        Self::TruncatedDictionary { bit_position }
    }

    /// Create an invalid dictionary error.
    pub fn invalid_dictionary(message: impl Into<String>) -> Self {
        Self::InvalidDictionary {
            message: message.into(),
        }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create a truncated payload error.
    pub fn truncated_payload(bit_position: u64) -> Self {
        Self::TruncatedPayload { bit_position }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: u64, actual: u64) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiHuffError::invalid_magic(b"OXHF".to_vec(), vec![0x1F, 0x8B]);
        assert!(err.to_string().contains("Invalid magic"));

        let err = OxiHuffError::invalid_huffman(42);
        assert!(err.to_string().contains("42"));

        let err = OxiHuffError::unaligned_input(9, 16);
        assert!(err.to_string().contains("16-bit"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OxiHuffError = io_err.into();
        assert!(matches!(err, OxiHuffError::Io(_)));
    }
}
