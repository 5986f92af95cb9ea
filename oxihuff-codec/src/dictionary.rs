//! Symbol-to-codeword dictionary and its bit-packed serialization.
//!
//! # Wire format
//!
//! The dictionary is a sequence of self-describing groups followed by a stop
//! bit. Every group holds codewords of one length:
//!
//! ```text
//! group   = 1'b1  count:7  length:4  count × (symbol:KEY_BITS  codeword:length)
//! stop    = 1'b0
//! ```
//!
//! Groups are emitted by descending codeword length, entries within a group
//! by ascending symbol value. A length with more than 127 entries is split
//! into several groups of the same length. Decoders do not depend on either
//! order.

use crate::tree::CodeTree;
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::Symbol;
use std::fmt;
use std::marker::PhantomData;

/// Width of the group size field.
pub const GROUP_SIZE_BITS: u8 = 7;

/// Width of the codeword length field.
pub const CODE_LENGTH_BITS: u8 = 4;

/// Largest number of entries a single group can declare.
pub const MAX_GROUP_SIZE: usize = (1 << GROUP_SIZE_BITS) - 1;

/// A root-to-leaf path: `length` bits of `bits`, MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Codeword {
    /// Path bits, right-aligned.
    pub bits: u32,
    /// Path length in bits.
    pub length: u8,
}

impl Codeword {
    /// Create a codeword.
    pub const fn new(bits: u32, length: u8) -> Self {
        Self { bits, length }
    }

    /// The codeword one edge further down the tree.
    pub fn extended(self, bit: bool) -> Self {
        Self {
            bits: (self.bits << 1) | u32::from(bit),
            length: self.length.saturating_add(1),
        }
    }

    /// Append the codeword to a bit stream.
    #[inline]
    pub fn write_to(self, writer: &mut BitWriter) {
        writer.put(self.length, self.bits);
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for shift in (0..self.length).rev() {
            let bit = (self.bits >> shift) & 1;
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// One dictionary header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRecord {
    /// `false` marks the stop record; the other fields are then absent.
    pub has_more: bool,
    /// Number of entries in the group (0..=127).
    pub group_size: u8,
    /// Codeword length shared by the group (0..=15).
    pub codeword_length: u8,
}

impl HeaderRecord {
    /// The stop record.
    pub const STOP: Self = Self {
        has_more: false,
        group_size: 0,
        codeword_length: 0,
    };

    /// A group record.
    pub const fn group(group_size: u8, codeword_length: u8) -> Self {
        Self {
            has_more: true,
            group_size,
            codeword_length,
        }
    }

    /// Serialized size of the record itself, in bits.
    pub const fn bit_len(&self) -> u64 {
        if self.has_more {
            1 + GROUP_SIZE_BITS as u64 + CODE_LENGTH_BITS as u64
        } else {
            1
        }
    }

    /// Write the record.
    pub fn write_to(&self, writer: &mut BitWriter) {
        writer.put_bit(self.has_more);
        if self.has_more {
            writer.put(GROUP_SIZE_BITS, u32::from(self.group_size));
            writer.put(CODE_LENGTH_BITS, u32::from(self.codeword_length));
        }
    }

    /// Read a record, failing if it crosses the reader's valid range.
    pub fn read_from(reader: &mut BitReader<'_>) -> Result<Self> {
        if reader.remaining_bits() < 1 {
            return Err(OxiHuffError::truncated_dictionary(reader.position()));
        }
        if !reader.get_bit() {
            return Ok(Self::STOP);
        }

        if reader.remaining_bits() < u64::from(GROUP_SIZE_BITS + CODE_LENGTH_BITS) {
            return Err(OxiHuffError::truncated_dictionary(reader.position()));
        }
        let group_size = reader.get(GROUP_SIZE_BITS) as u8;
        let codeword_length = reader.get(CODE_LENGTH_BITS) as u8;
        Ok(Self::group(group_size, codeword_length))
    }
}

/// A run of same-length entries, as serialized under one [`HeaderRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<S> {
    /// Codeword length of every entry.
    pub length: u8,
    /// Entries in emission order.
    pub entries: Vec<(S, Codeword)>,
}

impl<S: Symbol> Group<S> {
    /// The header record announcing this group.
    pub fn record(&self) -> HeaderRecord {
        HeaderRecord::group(self.entries.len() as u8, self.length)
    }

    /// Serialized size including the header record, in bits.
    pub fn bit_len(&self) -> u64 {
        self.record().bit_len()
            + self.entries.len() as u64 * (u64::from(S::BITS) + u64::from(self.length))
    }
}

/// Mapping from symbol to codeword; keys are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary<S: Symbol> {
    entries: Vec<Option<Codeword>>,
    len: usize,
    _symbol: PhantomData<S>,
}

impl<S: Symbol> Dictionary<S> {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self {
            entries: vec![None; S::ALPHABET_SIZE],
            len: 0,
            _symbol: PhantomData,
        }
    }

    /// Collect the leaf paths of a tree.
    pub fn from_tree(tree: &CodeTree<S>) -> Result<Self> {
        let mut dictionary = Self::new();
        for (symbol, codeword) in tree.codewords() {
            dictionary.insert(symbol, codeword)?;
        }
        Ok(dictionary)
    }

    /// Add an entry. A symbol may appear only once.
    pub fn insert(&mut self, symbol: S, codeword: Codeword) -> Result<()> {
        let slot = &mut self.entries[symbol.index()];
        if let Some(existing) = slot {
            return Err(OxiHuffError::invalid_dictionary(format!(
                "symbol {symbol:?} listed twice ({existing} and {codeword})"
            )));
        }
        *slot = Some(codeword);
        self.len += 1;
        Ok(())
    }

    /// Codeword of `symbol`.
    #[inline]
    pub fn get(&self, symbol: S) -> Option<Codeword> {
        self.entries[symbol.index()]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, Codeword)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.map(|cw| (S::from_bits(index as u32), cw)))
    }

    /// Longest codeword length.
    pub fn max_length(&self) -> u8 {
        self.iter().map(|(_, cw)| cw.length).max().unwrap_or(0)
    }

    /// Entries grouped for serialization: descending length, ascending
    /// symbol, at most [`MAX_GROUP_SIZE`] entries per group.
    pub fn groups(&self) -> Vec<Group<S>> {
        let mut by_length: Vec<Vec<(S, Codeword)>> = Vec::new();
        for (symbol, codeword) in self.iter() {
            let length = usize::from(codeword.length);
            if by_length.len() <= length {
                by_length.resize_with(length + 1, Vec::new);
            }
            by_length[length].push((symbol, codeword));
        }

        let mut groups = Vec::new();
        for (length, entries) in by_length.into_iter().enumerate().rev() {
            for chunk in entries.chunks(MAX_GROUP_SIZE) {
                groups.push(Group {
                    length: length as u8,
                    entries: chunk.to_vec(),
                });
            }
        }
        groups
    }

    /// Size of the serialized dictionary including the stop bit, in bits.
    pub fn serialized_bits(&self) -> u64 {
        self.groups().iter().map(Group::bit_len).sum::<u64>() + HeaderRecord::STOP.bit_len()
    }

    /// Serialize all groups and the stop record.
    pub fn write_to(&self, writer: &mut BitWriter) {
        for group in self.groups() {
            group.record().write_to(writer);
            for (symbol, codeword) in &group.entries {
                writer.put(S::BITS, symbol.to_bits());
                codeword.write_to(writer);
            }
        }
        HeaderRecord::STOP.write_to(writer);
    }
}

impl<S: Symbol> Default for Dictionary<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> fmt::Display for Dictionary<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_width = usize::from(S::BITS.div_ceil(4));
        for group in self.groups() {
            writeln!(f, "[{} x {} bits]", group.entries.len(), group.length)?;
            for (symbol, codeword) in &group.entries {
                writeln!(
                    f,
                    "  0x{:0width$x} => {codeword}",
                    symbol.to_bits(),
                    width = hex_width
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codeword_display() {
        assert_eq!(Codeword::new(0b0101, 4).to_string(), "0101");
        assert_eq!(Codeword::new(1, 1).to_string(), "1");
        assert_eq!(Codeword::default().to_string(), "");
    }

    #[test]
    fn test_header_record_roundtrip() {
        let mut writer = BitWriter::new();
        HeaderRecord::group(127, 15).write_to(&mut writer);
        HeaderRecord::group(3, 2).write_to(&mut writer);
        HeaderRecord::STOP.write_to(&mut writer);
        assert_eq!(writer.position(), 12 + 12 + 1);

        let mut reader = writer.into_reader();
        assert_eq!(HeaderRecord::read_from(&mut reader).unwrap(), HeaderRecord::group(127, 15));
        assert_eq!(HeaderRecord::read_from(&mut reader).unwrap(), HeaderRecord::group(3, 2));
        assert_eq!(HeaderRecord::read_from(&mut reader).unwrap(), HeaderRecord::STOP);
        assert!(matches!(
            HeaderRecord::read_from(&mut reader),
            Err(OxiHuffError::TruncatedDictionary { bit_position: 25 })
        ));
    }

    #[test]
    fn test_truncated_record() {
        // Flag bit set, but only 5 more valid bits
        let mut reader = BitReader::new(&[0xFF]).with_limit(6);
        assert!(matches!(
            HeaderRecord::read_from(&mut reader),
            Err(OxiHuffError::TruncatedDictionary { bit_position: 1 })
        ));
    }

    #[test]
    fn test_duplicate_symbol() {
        let mut dictionary = Dictionary::<u8>::new();
        dictionary.insert(7, Codeword::new(0, 1)).unwrap();
        assert!(dictionary.insert(7, Codeword::new(1, 1)).is_err());
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn test_groups_order() {
        let mut dictionary = Dictionary::<u8>::new();
        dictionary.insert(b'c', Codeword::new(0b11, 2)).unwrap();
        dictionary.insert(b'a', Codeword::new(0b0, 1)).unwrap();
        dictionary.insert(b'b', Codeword::new(0b10, 2)).unwrap();

        let groups = dictionary.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].length, 2);
        assert_eq!(
            groups[0].entries,
            vec![(b'b', Codeword::new(0b10, 2)), (b'c', Codeword::new(0b11, 2))]
        );
        assert_eq!(groups[1].length, 1);
        assert_eq!(groups[1].record(), HeaderRecord::group(1, 1));

        // (12 + 2*10) + (12 + 9) + stop
        assert_eq!(dictionary.serialized_bits(), 32 + 21 + 1);
    }

    #[test]
    fn test_large_group_split() {
        let mut dictionary = Dictionary::<u8>::new();
        for symbol in 0..=255u8 {
            dictionary.insert(symbol, Codeword::new(u32::from(symbol), 8)).unwrap();
        }
        let groups = dictionary.groups();
        let sizes: Vec<usize> = groups.iter().map(|g| g.entries.len()).collect();
        assert_eq!(sizes, vec![127, 127, 2]);
        assert!(groups.iter().all(|g| g.length == 8));
        assert_eq!(dictionary.serialized_bits(), 3 * 12 + 256 * 16 + 1);
    }

    #[test]
    fn test_write_matches_serialized_bits() {
        let mut dictionary = Dictionary::<u16>::new();
        dictionary.insert(0x1234, Codeword::new(0, 1)).unwrap();
        dictionary.insert(0xFFFF, Codeword::new(1, 1)).unwrap();

        let mut writer = BitWriter::new();
        dictionary.write_to(&mut writer);
        assert_eq!(writer.position(), dictionary.serialized_bits());
        assert_eq!(writer.position(), 12 + 2 * 17 + 1);
    }

    #[test]
    fn test_display() {
        let mut dictionary = Dictionary::<u8>::new();
        dictionary.insert(b'A', Codeword::new(1, 1)).unwrap();
        dictionary.insert(b'B', Codeword::new(0, 1)).unwrap();
        assert_eq!(dictionary.to_string(), "[2 x 1 bits]\n  0x41 => 1\n  0x42 => 0\n");
    }
}
