//! OXHF frame container.
//!
//! A frame stores one encoded stream together with what a decoder needs to
//! validate it. The stream itself is embedded bit-for-bit unchanged.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "OXHF"
//! 4       1     version
//! 5       1     symbol width in bits
//! 6       1     flags (bit 0: passthrough)
//! 7       1     reserved, zero
//! 8       8     original length in bytes (LE)
//! 16      8     stream length in bits (LE)
//! 24      n     stream bytes, n = ceil(bits / 8)
//! ```

use crate::codec::{EncodedStream, HuffmanCodec, StreamMode};
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::{Compressor, Decompressor, Symbol};

/// Frame magic bytes.
pub const FRAME_MAGIC: [u8; 4] = *b"OXHF";

/// Current frame format version.
pub const FRAME_VERSION: u8 = 1;

/// Size of the fixed frame header.
pub const FRAME_HEADER_SIZE: usize = 24;

/// Frame header flags.
pub mod flags {
    /// The stream is the passthrough form.
    pub const PASSTHROUGH: u8 = 0x01;
    /// All defined flags.
    pub const KNOWN: u8 = PASSTHROUGH;
}

/// Fixed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Symbol width in bits.
    pub symbol_bits: u8,
    /// Stream mode.
    pub mode: StreamMode,
    /// Original length in bytes.
    pub original_len: u64,
    /// Stream length in bits.
    pub stream_bits: u64,
}

impl FrameHeader {
    /// Header describing `stream`, encoded from `original_len` bytes of
    /// `S`-sized symbols.
    pub fn for_stream<S: Symbol>(stream: &EncodedStream, original_len: u64) -> Self {
        Self {
            symbol_bits: S::BITS,
            mode: stream.mode,
            original_len,
            stream_bits: stream.bit_len,
        }
    }

    /// Stream size in bytes.
    pub fn stream_len(&self) -> u64 {
        self.stream_bits.div_ceil(8)
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut out = [0u8; FRAME_HEADER_SIZE];
        out[0..4].copy_from_slice(&FRAME_MAGIC);
        out[4] = FRAME_VERSION;
        out[5] = self.symbol_bits;
        out[6] = match self.mode {
            StreamMode::Passthrough => flags::PASSTHROUGH,
            StreamMode::Huffman => 0,
        };
        out[8..16].copy_from_slice(&self.original_len.to_le_bytes());
        out[16..24].copy_from_slice(&self.stream_bits.to_le_bytes());
        out
    }

    /// Parse and validate a header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(OxiHuffError::unexpected_eof(FRAME_HEADER_SIZE - data.len()));
        }

        if data[0..4] != FRAME_MAGIC {
            return Err(OxiHuffError::invalid_magic(FRAME_MAGIC, &data[0..4]));
        }

        let version = data[4];
        if version != FRAME_VERSION {
            return Err(OxiHuffError::UnsupportedVersion { version });
        }

        let symbol_bits = data[5];
        if symbol_bits == 0 || symbol_bits % 8 != 0 {
            return Err(OxiHuffError::invalid_header(format!(
                "symbol width {symbol_bits} is not a whole number of bytes"
            )));
        }

        let frame_flags = data[6];
        if frame_flags & !flags::KNOWN != 0 {
            return Err(OxiHuffError::invalid_header(format!(
                "unknown flags {frame_flags:#04x}"
            )));
        }
        if data[7] != 0 {
            return Err(OxiHuffError::invalid_header("reserved byte is not zero"));
        }

        let mode = if frame_flags & flags::PASSTHROUGH != 0 {
            StreamMode::Passthrough
        } else {
            StreamMode::Huffman
        };

        let original_len = u64::from_le_bytes(read_array(&data[8..16]));
        let stream_bits = u64::from_le_bytes(read_array(&data[16..24]));
        if stream_bits == 0 {
            return Err(OxiHuffError::invalid_header("empty stream"));
        }

        Ok(Self {
            symbol_bits,
            mode,
            original_len,
            stream_bits,
        })
    }
}

fn read_array(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    out
}

/// Encode `input` and wrap the stream in a frame.
pub fn compress_frame<S: Symbol>(codec: &mut HuffmanCodec<S>, input: &[u8]) -> Result<Vec<u8>> {
    let stream = codec.encode(input)?;
    let header = FrameHeader::for_stream::<S>(&stream, input.len() as u64);

    let mut out = Vec::with_capacity(FRAME_HEADER_SIZE + stream.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(stream.as_bytes());
    Ok(out)
}

/// Split a frame into its header and stream.
pub fn read_frame(data: &[u8]) -> Result<(FrameHeader, EncodedStream)> {
    let header = FrameHeader::parse(data)?;
    let body = &data[FRAME_HEADER_SIZE..];
    let stream_len = header.stream_len();

    if (body.len() as u64) < stream_len {
        return Err(OxiHuffError::unexpected_eof(
            (stream_len - body.len() as u64) as usize,
        ));
    }
    if body.len() as u64 > stream_len {
        return Err(OxiHuffError::corrupted(
            FRAME_HEADER_SIZE as u64 + stream_len,
            "trailing data after stream",
        ));
    }

    // The stream's first bit must agree with the passthrough flag
    let first_bit_set = body[0] & 0x80 != 0;
    if first_bit_set != (header.mode == StreamMode::Huffman) {
        return Err(OxiHuffError::corrupted(
            FRAME_HEADER_SIZE as u64,
            format!("stream does not start as {}", header.mode),
        ));
    }

    let stream = EncodedStream {
        data: body.to_vec(),
        bit_len: header.stream_bits,
        mode: header.mode,
    };
    Ok((header, stream))
}

/// Unwrap a frame and decode its stream.
pub fn decompress_frame<S: Symbol>(codec: &mut HuffmanCodec<S>, data: &[u8]) -> Result<Vec<u8>> {
    let (header, stream) = read_frame(data)?;
    if header.symbol_bits != S::BITS {
        return Err(OxiHuffError::SymbolWidthMismatch {
            expected: S::BITS,
            found: header.symbol_bits,
        });
    }

    let expected_len = usize::try_from(header.original_len).ok();
    let mut reader = stream.into_reader();
    let output = codec.decode_reader(&mut reader, expected_len)?;

    if output.len() as u64 != header.original_len {
        return Err(OxiHuffError::length_mismatch(
            header.original_len,
            output.len() as u64,
        ));
    }
    Ok(output)
}

impl<S: Symbol> Compressor for HuffmanCodec<S> {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        compress_frame(self, input)
    }
}

impl<S: Symbol> Decompressor for HuffmanCodec<S> {
    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        decompress_frame(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = FrameHeader {
            symbol_bits: 8,
            mode: StreamMode::Passthrough,
            original_len: 0x0102,
            stream_bits: 41,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"OXHF");
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5], 8);
        assert_eq!(bytes[6], flags::PASSTHROUGH);
        assert_eq!(bytes[7], 0);
        assert_eq!(&bytes[8..10], &[0x02, 0x01]);
        assert_eq!(bytes[16], 41);
        assert_eq!(header.stream_len(), 6);
        assert_eq!(FrameHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn test_frame_two_symbols() {
        let mut codec = HuffmanCodec::<u8>::default();
        let frame = codec.compress(b"AAAAAAAAAB").unwrap();
        assert_eq!(frame.len(), FRAME_HEADER_SIZE + 6);
        assert_eq!(&frame[24..], &[0x82, 0x14, 0x1A, 0x11, 0xFF, 0x00]);
        assert_eq!(codec.decompress(&frame).unwrap(), b"AAAAAAAAAB");
    }

    #[test]
    fn test_bad_magic() {
        let mut frame = HuffmanCodec::<u8>::default().compress(b"hello").unwrap();
        frame[0] = b'X';
        assert!(matches!(
            HuffmanCodec::<u8>::default().decompress(&frame),
            Err(OxiHuffError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_bad_version() {
        let mut frame = HuffmanCodec::<u8>::default().compress(b"hello").unwrap();
        frame[4] = 9;
        assert!(matches!(
            FrameHeader::parse(&frame),
            Err(OxiHuffError::UnsupportedVersion { version: 9 })
        ));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            FrameHeader::parse(b"OXHF"),
            Err(OxiHuffError::UnexpectedEof { expected: 20 })
        ));
    }

    #[test]
    fn test_truncated_and_trailing_stream() {
        let frame = HuffmanCodec::<u8>::default().compress(b"hello world").unwrap();

        let short = &frame[..frame.len() - 1];
        assert!(matches!(
            read_frame(short),
            Err(OxiHuffError::UnexpectedEof { expected: 1 })
        ));

        let mut long = frame.clone();
        long.push(0);
        assert!(matches!(
            read_frame(&long),
            Err(OxiHuffError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_symbol_width_mismatch() {
        let frame = HuffmanCodec::<u16>::default().compress(&[0, 1, 0, 1]).unwrap();
        assert!(matches!(
            HuffmanCodec::<u8>::default().decompress(&frame),
            Err(OxiHuffError::SymbolWidthMismatch {
                expected: 8,
                found: 16
            })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let mut frame = HuffmanCodec::<u8>::default().compress(b"abcabcabc").unwrap();
        frame[8] += 1;
        assert!(matches!(
            HuffmanCodec::<u8>::default().decompress(&frame),
            Err(OxiHuffError::LengthMismatch {
                expected: 10,
                actual: 9
            })
        ));
    }

    #[test]
    fn test_huge_original_length() {
        let input = b"abracadabra abracadabra abracadabra";
        let mut frame = HuffmanCodec::<u8>::default().compress(input).unwrap();
        assert_eq!(frame[6], 0);
        frame[8..16].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            HuffmanCodec::<u8>::default().decompress(&frame),
            Err(OxiHuffError::LengthMismatch {
                expected: u64::MAX,
                actual: 35
            })
        ));
    }

    #[test]
    fn test_flag_disagrees_with_stream() {
        let mut frame = HuffmanCodec::<u8>::default().compress(b"AAAAAAAAAB").unwrap();
        frame[6] = flags::PASSTHROUGH;
        assert!(matches!(
            read_frame(&frame),
            Err(OxiHuffError::CorruptedData { offset: 24, .. })
        ));
    }
}
