//! Encoding: frequency count, tree, dictionary, payload, fallback.

use crate::codec::{EncodeReport, EncodedStream, HuffmanCodec, StreamMode};
use crate::config::FallbackMode;
use crate::dictionary::Dictionary;
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::Symbol;

impl<S: Symbol> HuffmanCodec<S> {
    /// Encode `input` into a stream.
    ///
    /// # Algorithm
    ///
    /// 1. Count symbol frequencies in one pass
    /// 2. Merge a min-priority queue of leaves into a code tree, limited to
    ///    `max_code_length` bits
    /// 3. Collect the leaf paths into a dictionary
    /// 4. Write the dictionary groups, the stop bit and every symbol's
    ///    codeword, bit-contiguous
    /// 5. If that is not smaller than the input, emit the passthrough form
    ///    instead: a `0` bit followed by the input bytes
    ///
    /// # Errors
    ///
    /// - [`OxiHuffError::UnalignedInput`] if the input is not a whole number
    ///   of symbols
    /// - [`OxiHuffError::CodeLengthOverflow`] in [`FallbackMode::Never`] when
    ///   the alphabet does not fit the length limit
    pub fn encode(&mut self, input: &[u8]) -> Result<EncodedStream> {
        self.config.validate()?;
        self.reset();

        let freqs = FrequencyTable::<S>::count(input)?;
        let fallback = self.config.fallback;

        if input.is_empty() || fallback == FallbackMode::Always {
            return Ok(self.passthrough(input, freqs.distinct()));
        }

        let tree = match CodeTree::with_max_length(&freqs, self.config.max_code_length) {
            Ok(Some(tree)) => tree,
            Ok(None) => return Ok(self.passthrough(input, 0)),
            Err(err @ OxiHuffError::CodeLengthOverflow { .. }) => {
                if fallback == FallbackMode::Auto {
                    tracing::warn!(%err, "no prefix code fits, storing input verbatim");
                    return Ok(self.passthrough(input, freqs.distinct()));
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let dictionary = Dictionary::from_tree(&tree)?;
        let dictionary_bits = dictionary.serialized_bits();
        let mut payload_bits = 0u64;
        for (symbol, count) in freqs.iter() {
            let codeword = Self::lookup(&dictionary, symbol)?;
            payload_bits += count * u64::from(codeword.length);
        }
        let total_bits = dictionary_bits + payload_bits;

        tracing::debug!(
            entries = dictionary.len(),
            groups = dictionary.groups().len(),
            dictionary_bits,
            max_code_length = dictionary.max_length(),
            "built dictionary"
        );

        if fallback == FallbackMode::Auto && total_bits.div_ceil(8) >= input.len() as u64 {
            tracing::warn!(
                input_bytes = input.len(),
                encoded_bytes = total_bits.div_ceil(8),
                "huffman coding does not shrink the input, storing verbatim"
            );
            return Ok(self.passthrough(input, freqs.distinct()));
        }

        let mut writer = BitWriter::with_capacity(total_bits.div_ceil(8) as usize);
        dictionary.write_to(&mut writer);

        if S::BITS == 8 {
            for &byte in input {
                let symbol = S::from_bits(u32::from(byte));
                Self::lookup(&dictionary, symbol)?.write_to(&mut writer);
            }
        } else {
            let mut reader = BitReader::new(input);
            while !reader.is_exhausted() {
                let symbol = S::from_bits(reader.get(S::BITS));
                Self::lookup(&dictionary, symbol)?.write_to(&mut writer);
            }
        }

        let bit_len = writer.position();
        debug_assert_eq!(bit_len, total_bits);
        writer.flush();
        let data = writer.into_bytes();

        self.report = EncodeReport {
            input_bytes: input.len() as u64,
            output_bytes: data.len() as u64,
            dictionary_bits,
            payload_bits,
            distinct_symbols: freqs.distinct(),
            max_code_length: dictionary.max_length(),
            mode: Some(StreamMode::Huffman),
        };
        tracing::info!(
            input_bytes = input.len(),
            output_bytes = data.len(),
            ratio = self.report.ratio(),
            "huffman encoded"
        );

        self.tree = Some(tree);
        self.dictionary = Some(dictionary);

        Ok(EncodedStream {
            data,
            bit_len,
            mode: StreamMode::Huffman,
        })
    }

    /// Emit the passthrough form of `input`.
    fn passthrough(&mut self, input: &[u8], distinct_symbols: usize) -> EncodedStream {
        let mut writer = BitWriter::with_capacity(input.len() + 1);
        writer.put_bit(false);
        writer.put_bytes(input);

        let bit_len = writer.position();
        writer.flush();
        let data = writer.into_bytes();

        self.report = EncodeReport {
            input_bytes: input.len() as u64,
            output_bytes: data.len() as u64,
            dictionary_bits: 0,
            payload_bits: input.len() as u64 * 8,
            distinct_symbols,
            max_code_length: 0,
            mode: Some(StreamMode::Passthrough),
        };
        tracing::info!(
            input_bytes = input.len(),
            output_bytes = data.len(),
            "stored verbatim"
        );

        EncodedStream {
            data,
            bit_len,
            mode: StreamMode::Passthrough,
        }
    }

    #[inline]
    fn lookup(dictionary: &Dictionary<S>, symbol: S) -> Result<crate::dictionary::Codeword> {
        dictionary.get(symbol).ok_or_else(|| {
            OxiHuffError::invalid_dictionary(format!("no codeword for symbol {symbol:?}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HuffmanConfig;

    #[test]
    fn test_two_symbol_bytes() {
        let mut codec = HuffmanCodec::<u8>::default();
        let stream = codec.encode(b"AAAAAAAAAB").unwrap();

        assert_eq!(stream.mode, StreamMode::Huffman);
        assert_eq!(stream.bit_len, 41);
        assert_eq!(stream.data, vec![0x82, 0x14, 0x1A, 0x11, 0xFF, 0x00]);

        let report = codec.last_report();
        assert_eq!(report.dictionary_bits, 31);
        assert_eq!(report.payload_bits, 10);
        assert_eq!(report.distinct_symbols, 2);
        assert_eq!(report.max_code_length, 1);
    }

    #[test]
    fn test_empty_input() {
        let mut codec = HuffmanCodec::<u8>::default();
        let stream = codec.encode(b"").unwrap();
        assert_eq!(stream.data, vec![0x00]);
        assert_eq!(stream.bit_len, 1);
        assert!(stream.is_passthrough());
        assert!(codec.tree().is_none());
    }

    #[test]
    fn test_passthrough_layout() {
        let mut codec = HuffmanCodec::<u8>::new(HuffmanConfig::STORE).unwrap();
        let stream = codec.encode(&[0xFF, 0x01]).unwrap();
        // 0 | 11111111 | 00000001 | pad
        assert_eq!(stream.data, vec![0x7F, 0x80, 0x80]);
        assert_eq!(stream.bit_len, 17);
    }

    #[test]
    fn test_short_input_falls_back() {
        let mut codec = HuffmanCodec::<u8>::default();
        let stream = codec.encode(b"ab").unwrap();
        assert!(stream.is_passthrough());
        assert!(codec.dictionary().is_none());
    }

    #[test]
    fn test_never_fallback_forces_huffman() {
        let config = HuffmanConfig::DEFAULT.with_fallback(FallbackMode::Never);
        let mut codec = HuffmanCodec::<u8>::new(config).unwrap();
        let stream = codec.encode(b"ab").unwrap();
        assert_eq!(stream.mode, StreamMode::Huffman);
        // One group (12 + 2*9), the stop bit, two payload bits
        assert_eq!(stream.bit_len, 33);
    }

    #[test]
    fn test_never_fallback_overflow() {
        let config = HuffmanConfig::new(2).with_fallback(FallbackMode::Never);
        let mut codec = HuffmanCodec::<u8>::new(config).unwrap();
        let err = codec.encode(b"abcde").unwrap_err();
        assert!(matches!(err, OxiHuffError::CodeLengthOverflow { .. }));
    }

    #[test]
    fn test_unaligned_wide_input() {
        let mut codec = HuffmanCodec::<u16>::default();
        assert!(matches!(
            codec.encode(&[1, 2, 3]),
            Err(OxiHuffError::UnalignedInput { .. })
        ));
    }
}
