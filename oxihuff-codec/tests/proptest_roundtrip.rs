//! Property-based tests for the Huffman codec.
//!
//! These tests verify that the codec properties hold across a wide range of inputs:
//! - Any byte buffer round-trips, through raw streams and frames
//! - Passthrough never costs more than one byte
//! - Codewords stay within the configured length limit

use proptest::prelude::*;

use oxihuff_codec::{FallbackMode, HuffmanCodec, HuffmanConfig, StreamMode, compress, decompress};

/// Strategy for buffers dominated by a few symbols.
fn skewed_bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'a'),
            3 => Just(b'b'),
            1 => any::<u8>(),
        ],
        0..2048,
    )
}

/// Strategy for the codeword length limit.
fn max_length_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![Just(8u8), Just(10), Just(12), Just(15)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: decode(encode(B)) == B for arbitrary bytes.
    #[test]
    fn prop_stream_roundtrip(input in prop::collection::vec(any::<u8>(), 0..4096)) {
        let mut codec = HuffmanCodec::<u8>::default();
        let stream = codec.encode(&input).unwrap();
        prop_assert_eq!(codec.decode(&stream).unwrap(), input);
    }

    /// Property: skewed buffers round-trip under every length limit.
    #[test]
    fn prop_skewed_roundtrip_limited(
        input in skewed_bytes_strategy(),
        max_length in max_length_strategy(),
    ) {
        let mut codec = HuffmanCodec::<u8>::new(HuffmanConfig::new(max_length)).unwrap();
        let stream = codec.encode(&input).unwrap();
        if let Some(dictionary) = codec.dictionary() {
            prop_assert!(dictionary.max_length() <= max_length);
        }
        prop_assert_eq!(codec.decode(&stream).unwrap(), input);
    }

    /// Property: the automatic fallback bounds the output at input + 1 byte.
    #[test]
    fn prop_output_bounded(input in prop::collection::vec(any::<u8>(), 0..2048)) {
        let mut codec = HuffmanCodec::<u8>::default();
        let stream = codec.encode(&input).unwrap();
        prop_assert!(stream.len() <= input.len() + 1);
        if stream.mode == StreamMode::Huffman {
            prop_assert!(stream.len() < input.len());
        }
    }

    /// Property: forced Huffman coding still round-trips.
    #[test]
    fn prop_never_fallback_roundtrip(input in prop::collection::vec(any::<u8>(), 1..1024)) {
        let config = HuffmanConfig::DEFAULT.with_fallback(FallbackMode::Never);
        let mut codec = HuffmanCodec::<u8>::new(config).unwrap();
        let stream = codec.encode(&input).unwrap();
        prop_assert_eq!(stream.mode, StreamMode::Huffman);
        prop_assert_eq!(codec.decode(&stream).unwrap(), input);
    }

    /// Property: 16-bit symbols round-trip for even-length buffers.
    #[test]
    fn prop_wide_roundtrip(words in prop::collection::vec(0u16..64, 0..1024)) {
        let input: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        let mut codec = HuffmanCodec::<u16>::default();
        let stream = codec.encode(&input).unwrap();
        prop_assert_eq!(codec.decode(&stream).unwrap(), input);
    }

    /// Property: frames round-trip.
    #[test]
    fn prop_frame_roundtrip(input in skewed_bytes_strategy()) {
        let frame = compress(&input).unwrap();
        prop_assert_eq!(decompress(&frame).unwrap(), input);
    }
}
