//! Bit-level I/O over in-memory buffers.
//!
//! This module provides [`BitBuffer`], a byte buffer with a bit-granular
//! cursor, and the [`BitReader`] / [`BitWriter`] pair built on top of it.
//!
//! # Bit Ordering
//!
//! Everything here is MSB-first: the first bit of a byte is its most
//! significant bit, and multi-bit values are emitted starting from their
//! most significant bit. This differs from DEFLATE/LZH, which pack LSB-first.
//!
//! # Out-of-range reads
//!
//! Reading past the valid end of a reader yields `0` bits instead of an
//! error. Callers that need to detect truncation must compare against
//! [`BitReader::remaining_bits`] before reading.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::BitWriter;
//!
//! let mut writer = BitWriter::new();
//! writer.put(3, 0b101);
//! writer.put(4, 0b1100);
//! writer.put_bit(true);
//!
//! // Hand the buffer to a reader without copying it.
//! let mut reader = writer.into_reader();
//! assert_eq!(reader.len_bits(), 8);
//! assert_eq!(reader.get(3), 0b101);
//! assert_eq!(reader.get(4), 0b1100);
//! assert!(reader.get_bit());
//!
//! // Past the end, reads are zero.
//! assert!(!reader.get_bit());
//! ```

use std::borrow::Cow;

/// Smallest growth step of a writer buffer, in bytes.
const MIN_GROWTH: usize = 16;

/// A byte buffer with a bit-granular cursor.
///
/// The buffer either borrows its bytes or owns them; ownership moves with the
/// buffer, so a writer's output can become a reader's input without a copy.
#[derive(Debug, Clone, Default)]
pub struct BitBuffer<'a> {
    /// Backing bytes.
    data: Cow<'a, [u8]>,
    /// Cursor as a bit offset from the start of `data`.
    cursor: u64,
}

impl<'a> BitBuffer<'a> {
    /// Create a buffer that borrows `data`.
    pub fn borrowed(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            cursor: 0,
        }
    }

    /// Create a buffer that owns `data`.
    pub fn owned(data: Vec<u8>) -> BitBuffer<'static> {
        BitBuffer {
            data: Cow::Owned(data),
            cursor: 0,
        }
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the buffer in bits.
    pub fn len_bits(&self) -> u64 {
        self.data.len() as u64 * 8
    }

    /// Current cursor position in bits.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Move the cursor to an absolute bit position.
    pub fn set_position(&mut self, position: u64) {
        self.cursor = position;
    }

    /// Whether this buffer owns its bytes.
    pub fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }

    /// The backing bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the backing bytes, copying only if they were borrowed.
    pub fn into_owned(self) -> Vec<u8> {
        self.data.into_owned()
    }

    /// Read the bit at `position`, or `0` past the end of the buffer.
    #[inline]
    fn bit_at(&self, position: u64) -> bool {
        match self.data.get((position / 8) as usize) {
            Some(byte) => (byte >> (7 - (position % 8))) & 1 != 0,
            None => false,
        }
    }
}

/// Sequential MSB-first bit reader over a [`BitBuffer`].
///
/// A reader has a valid bit length (`len_bits`), which defaults to the whole
/// buffer and can be narrowed with [`BitReader::with_limit`] so that trailing
/// padding bits are never mistaken for data.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Underlying buffer.
    buf: BitBuffer<'a>,
    /// Number of valid bits.
    limit: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader borrowing `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::from_buffer(BitBuffer::borrowed(data))
    }

    /// Create a reader that owns `data`.
    pub fn from_vec(data: Vec<u8>) -> BitReader<'static> {
        BitReader::from_buffer(BitBuffer::owned(data))
    }

    /// Create a reader over an existing buffer, starting at its cursor.
    pub fn from_buffer(buf: BitBuffer<'a>) -> Self {
        let limit = buf.len_bits();
        Self { buf, limit }
    }

    /// Restrict the valid bit length. Bits at or past `bits` read as zero.
    pub fn with_limit(mut self, bits: u64) -> Self {
        self.limit = bits.min(self.buf.len_bits());
        self
    }

    /// Number of valid bits.
    pub fn len_bits(&self) -> u64 {
        self.limit
    }

    /// Size of the underlying buffer in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the underlying buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current bit position.
    pub fn position(&self) -> u64 {
        self.buf.position()
    }

    /// Move to an absolute bit position.
    pub fn set_position(&mut self, position: u64) {
        self.buf.set_position(position);
    }

    /// Rewind to the start of the buffer.
    pub fn reset(&mut self) {
        self.buf.set_position(0);
    }

    /// Valid bits left after the cursor.
    pub fn remaining_bits(&self) -> u64 {
        self.limit.saturating_sub(self.buf.position())
    }

    /// Check if the cursor reached the end of the valid range.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Check if the cursor sits on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.buf.position() % 8 == 0
    }

    /// Read one bit and advance the cursor.
    ///
    /// Returns `false` (a zero bit) past the valid range.
    #[inline]
    pub fn get_bit(&mut self) -> bool {
        let position = self.buf.position();
        self.buf.set_position(position + 1);
        position < self.limit && self.buf.bit_at(position)
    }

    /// Read `count` bits (at most 32) MSB-first into an integer.
    ///
    /// Bits past the valid range read as zero; the cursor still advances by
    /// `count`.
    #[inline]
    pub fn get(&mut self, count: u8) -> u32 {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u64;
        let mut remaining = u64::from(count);
        let data = self.buf.as_bytes();
        let mut position = self.buf.position();

        while remaining > 0 {
            if position >= self.limit {
                // Zero-fill the rest
                value <<= remaining;
                position += remaining;
                break;
            }

            let bit_offset = position % 8;
            let free_in_byte = 8 - bit_offset;
            let take = remaining.min(free_in_byte).min(self.limit - position);

            let byte = u64::from(data[(position / 8) as usize]);
            let chunk = (byte >> (free_in_byte - take)) & ((1u64 << take) - 1);

            value = (value << take) | chunk;
            position += take;
            remaining -= take;
        }

        self.buf.set_position(position);
        value as u32
    }

    /// Skip `count` bits.
    pub fn skip(&mut self, count: u64) {
        let position = self.buf.position();
        self.buf.set_position(position + count);
    }

    /// Zero-copy view of the remaining whole bytes, if the cursor is aligned.
    pub fn aligned_remainder(&self) -> Option<&[u8]> {
        if !self.is_byte_aligned() {
            return None;
        }
        let start = (self.buf.position() / 8) as usize;
        let end = (self.limit / 8) as usize;
        self.buf.as_bytes().get(start..end.max(start))
    }

    /// Read `count` whole bytes into `out`, regardless of alignment.
    ///
    /// Bytes past the valid range read as zero.
    pub fn read_bytes(&mut self, count: usize, out: &mut Vec<u8>) {
        out.reserve(count);
        let position = self.buf.position();
        let needed = count as u64 * 8;

        if position + needed > self.limit {
            for _ in 0..count {
                out.push(self.get(8) as u8);
            }
            return;
        }

        let data = self.buf.as_bytes();
        let start = (position / 8) as usize;
        let shift = (position % 8) as u32;

        if shift == 0 {
            out.extend_from_slice(&data[start..start + count]);
        } else {
            // Each output byte straddles two input bytes
            for i in 0..count {
                let hi = data[start + i] << shift;
                let lo = data.get(start + i + 1).map_or(0, |b| b >> (8 - shift));
                out.push(hi | lo);
            }
        }

        self.buf.set_position(position + needed);
    }

    /// Consume the reader and return its buffer.
    pub fn into_buffer(self) -> BitBuffer<'a> {
        self.buf
    }
}

/// Sequential MSB-first bit writer that owns a growable [`BitBuffer`].
///
/// The backing buffer is zero-filled, so bits that are skipped or never
/// written read back as zero. Writes past the current size grow the buffer by
/// the same policy as [`BitWriter::resize`].
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Underlying owned buffer.
    buf: BitBuffer<'static>,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a zero-filled buffer of `size` bytes.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            buf: BitBuffer::owned(vec![0u8; size]),
        }
    }

    /// Current size of the backing buffer in bytes.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Number of bits written so far (the cursor position).
    pub fn position(&self) -> u64 {
        self.buf.position()
    }

    /// Number of bytes touched by the written bits.
    pub fn last_byte_position(&self) -> usize {
        self.buf.position().div_ceil(8) as usize
    }

    /// Bits that can still be written before the buffer must grow.
    pub fn headroom_bits(&self) -> u64 {
        self.buf.len_bits().saturating_sub(self.buf.position())
    }

    /// Grow the backing buffer and return its new size in bytes.
    ///
    /// With `new_size == 0` the buffer grows by 50% (at least a few bytes).
    /// Existing bytes are kept; the buffer never shrinks.
    pub fn resize(&mut self, new_size: usize) -> usize {
        let current = self.buf.len();
        let target = if new_size == 0 {
            current + (current / 2).max(MIN_GROWTH)
        } else {
            new_size
        };

        if target > current {
            self.bytes_mut().resize(target, 0);
        }
        self.buf.len()
    }

    /// Write a single bit.
    #[inline]
    pub fn put_bit(&mut self, bit: bool) {
        let position = self.buf.position();
        let index = (position / 8) as usize;
        self.reserve_bits(1);

        let mask = 0x80u8 >> (position % 8);
        let byte = &mut self.bytes_mut()[index];
        if bit {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.buf.set_position(position + 1);
    }

    /// Write the low `count` bits (at most 32) of `value`, MSB-first.
    #[inline]
    pub fn put(&mut self, count: u8, value: u32) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        self.reserve_bits(u64::from(count));

        let mut position = self.buf.position();
        let mut remaining = u32::from(count);
        let value = u64::from(value);
        let data = self.bytes_mut();

        while remaining > 0 {
            let free_in_byte = 8 - (position % 8) as u32;
            let take = remaining.min(free_in_byte);
            let shift = free_in_byte - take;

            let mask = ((1u64 << take) - 1) as u8;
            let chunk = ((value >> (remaining - take)) as u8) & mask;

            let byte = &mut data[(position / 8) as usize];
            *byte = (*byte & !(mask << shift)) | (chunk << shift);

            position += u64::from(take);
            remaining -= take;
        }

        self.buf.set_position(position);
    }

    /// Write whole bytes, regardless of alignment.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        let position = self.buf.position();
        if position % 8 == 0 {
            self.reserve_bits(bytes.len() as u64 * 8);
            let start = (position / 8) as usize;
            self.bytes_mut()[start..start + bytes.len()].copy_from_slice(bytes);
            self.buf.set_position(position + bytes.len() as u64 * 8);
        } else {
            for &byte in bytes {
                self.put(8, u32::from(byte));
            }
        }
    }

    /// Advance to the next byte boundary, zeroing the unwritten bits of the
    /// partial byte.
    pub fn flush(&mut self) {
        let position = self.buf.position();
        let used = position % 8;
        if used == 0 {
            return;
        }

        let index = (position / 8) as usize;
        let keep = !(0xFFu8 >> used);
        if let Some(byte) = self.bytes_mut().get_mut(index) {
            *byte &= keep;
        }
        self.buf.set_position(position + (8 - used));
    }

    /// The bytes touched so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_bytes()[..self.last_byte_position()]
    }

    /// Consume the writer and return the bytes touched so far.
    pub fn into_bytes(self) -> Vec<u8> {
        let used = self.last_byte_position();
        let mut bytes = self.buf.into_owned();
        bytes.truncate(used);
        bytes
    }

    /// Move the written bits into a reader positioned at the start.
    ///
    /// The reader's valid length is exactly the number of bits written.
    pub fn into_reader(self) -> BitReader<'static> {
        let bits = self.buf.position();
        BitReader::from_vec(self.into_bytes()).with_limit(bits)
    }

    /// Make sure `count` more bits fit, growing the buffer as needed.
    #[inline]
    fn reserve_bits(&mut self, count: u64) {
        let needed = (self.buf.position() + count).div_ceil(8) as usize;
        while self.buf.len() < needed {
            self.resize(0);
        }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut Vec<u8> {
        self.buf.data.to_mut()
    }
}
