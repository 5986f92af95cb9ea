//! Codec configuration.

use oxihuff_core::error::{OxiHuffError, Result};

/// Largest codeword length the 4-bit dictionary length field can carry.
pub const MAX_CODE_LENGTH: u8 = 15;

/// When the encoder emits the verbatim passthrough form instead of Huffman
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Passthrough whenever the Huffman form is not smaller than the input.
    #[default]
    Auto,
    /// Always emit Huffman codes, even if the output grows.
    Never,
    /// Always emit the passthrough form (store mode).
    Always,
}

/// Huffman codec configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanConfig {
    /// Maximum codeword length in bits (1-15).
    ///
    /// Trees deeper than this are rebuilt from scaled frequencies until they
    /// fit.
    pub max_code_length: u8,
    /// Passthrough policy.
    pub fallback: FallbackMode,
}

impl HuffmanConfig {
    /// Default configuration: 15-bit codewords, automatic passthrough.
    pub const DEFAULT: Self = Self {
        max_code_length: MAX_CODE_LENGTH,
        fallback: FallbackMode::Auto,
    };

    /// Store-only configuration: every stream is a passthrough.
    pub const STORE: Self = Self {
        max_code_length: MAX_CODE_LENGTH,
        fallback: FallbackMode::Always,
    };

    /// Create a configuration with the given codeword length limit.
    pub fn new(max_code_length: u8) -> Self {
        Self {
            max_code_length,
            ..Self::DEFAULT
        }
    }

    /// Set the passthrough policy.
    pub fn with_fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    /// Check that the parameters describe a writable format.
    pub fn validate(&self) -> Result<()> {
        if self.max_code_length == 0 || self.max_code_length > MAX_CODE_LENGTH {
            return Err(OxiHuffError::invalid_config(format!(
                "max_code_length {} must be within 1..={}",
                self.max_code_length, MAX_CODE_LENGTH
            )));
        }
        Ok(())
    }
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HuffmanConfig::default();
        assert_eq!(config.max_code_length, 15);
        assert_eq!(config.fallback, FallbackMode::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_config() {
        let config = HuffmanConfig::STORE;
        assert_eq!(config.fallback, FallbackMode::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(HuffmanConfig::new(0).validate().is_err());
        assert!(HuffmanConfig::new(16).validate().is_err());
        assert!(HuffmanConfig::new(1).validate().is_ok());
    }

    #[test]
    fn test_with_fallback() {
        let config = HuffmanConfig::new(12).with_fallback(FallbackMode::Never);
        assert_eq!(config.max_code_length, 12);
        assert_eq!(config.fallback, FallbackMode::Never);
    }
}
