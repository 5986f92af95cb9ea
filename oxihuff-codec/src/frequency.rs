//! Symbol frequency counting.

use oxihuff_core::bitstream::BitReader;
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::Symbol;
use std::marker::PhantomData;

/// Occurrence counts for every symbol of the alphabet.
///
/// Counts are stored densely by [`Symbol::index`], so iteration always visits
/// symbols in ascending order. Tree construction relies on that order for its
/// tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: Vec<u64>,
    total: u64,
    distinct: usize,
    _symbol: PhantomData<S>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: vec![0; S::ALPHABET_SIZE],
            total: 0,
            distinct: 0,
            _symbol: PhantomData,
        }
    }

    /// Count every symbol of `input` in a single pass.
    ///
    /// The input is read `S::BITS` bits at a time; its bit length must be a
    /// whole number of symbols.
    pub fn count(input: &[u8]) -> Result<Self> {
        let bits = input.len() as u64 * 8;
        if bits % u64::from(S::BITS) != 0 {
            return Err(OxiHuffError::unaligned_input(bits, S::BITS));
        }

        let mut table = Self::new();
        if S::BITS == 8 {
            for &byte in input {
                table.add(S::from_bits(u32::from(byte)));
            }
        } else {
            let mut reader = BitReader::new(input);
            while !reader.is_exhausted() {
                table.add(S::from_bits(reader.get(S::BITS)));
            }
        }
        Ok(table)
    }

    /// Record one occurrence of `symbol`.
    #[inline]
    pub fn add(&mut self, symbol: S) {
        self.add_count(symbol, 1);
    }

    /// Record `count` occurrences of `symbol`.
    pub fn add_count(&mut self, symbol: S, count: u64) {
        if count == 0 {
            return;
        }
        let slot = &mut self.counts[symbol.index()];
        if *slot == 0 {
            self.distinct += 1;
        }
        *slot += count;
        self.total += count;
    }

    /// Occurrences of `symbol`.
    pub fn get(&self, symbol: S) -> u64 {
        self.counts[symbol.index()]
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// Check if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate `(symbol, count)` over used symbols in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(index, &count)| (S::from_bits(index as u32), count))
    }

    /// A flattened copy with every used count halved, rounding up.
    ///
    /// Counts never drop below one, so used symbols stay used. Every count
    /// above one shrinks, so repeated scaling reaches a flat table.
    pub fn scaled(&self) -> Self {
        let mut table = Self::new();
        for (symbol, count) in self.iter() {
            table.add_count(symbol, count.div_ceil(2));
        }
        table
    }

    /// Check if every used symbol has a count of one.
    pub fn is_flat(&self) -> bool {
        self.total == self.distinct as u64
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_bytes() {
        let table = FrequencyTable::<u8>::count(b"AAAAAAAAAB").unwrap();
        assert_eq!(table.get(b'A'), 9);
        assert_eq!(table.get(b'B'), 1);
        assert_eq!(table.get(b'C'), 0);
        assert_eq!(table.total(), 10);
        assert_eq!(table.distinct(), 2);
    }

    #[test]
    fn test_iter_ascending() {
        let table = FrequencyTable::<u8>::count(b"zyxzyz").unwrap();
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(b'x', 1), (b'y', 2), (b'z', 3)]);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::<u8>::count(b"").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_count_wide_symbols() {
        let table = FrequencyTable::<u16>::count(&[0x12, 0x34, 0x12, 0x34, 0x00, 0x01]).unwrap();
        assert_eq!(table.get(0x1234), 2);
        assert_eq!(table.get(0x0001), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_unaligned_wide_input() {
        let err = FrequencyTable::<u16>::count(&[0x12, 0x34, 0x56]).unwrap_err();
        assert!(matches!(
            err,
            OxiHuffError::UnalignedInput {
                bits: 24,
                symbol_bits: 16
            }
        ));
    }

    #[test]
    fn test_scaled_converges() {
        let mut table = FrequencyTable::<u8>::new();
        table.add_count(1, 1000);
        table.add_count(2, 3);
        table.add_count(3, 1);

        let scaled = table.scaled();
        assert_eq!(scaled.get(1), 500);
        assert_eq!(scaled.get(2), 2);
        assert_eq!(scaled.get(3), 1);
        assert_eq!(scaled.distinct(), 3);

        let mut flat = table;
        let mut rounds = 0;
        while !flat.is_flat() {
            flat = flat.scaled();
            rounds += 1;
            assert!(rounds <= 64, "scaling stalled at {:?}", flat.iter().collect::<Vec<_>>());
        }
        assert_eq!(flat.total(), 3);
        assert_eq!(rounds, 10);
    }

    #[test]
    fn test_scaled_flattens_twos() {
        let mut table = FrequencyTable::<u8>::new();
        table.add_count(b'a', 2);
        table.add_count(b'b', 2);
        table.add_count(b'c', 1);

        let scaled = table.scaled();
        assert!(scaled.is_flat());
        assert_eq!(scaled.distinct(), 3);
        assert_eq!(scaled.scaled(), scaled);
    }
}
