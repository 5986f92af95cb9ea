//! Decoding: dictionary parse, tree rebuild, payload walk, passthrough copy.

use crate::codec::{EncodedStream, HuffmanCodec};
use crate::dictionary::{Codeword, Dictionary, HeaderRecord};
use crate::tree::CodeTree;
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::Symbol;

/// Minimum output headroom, in bits, kept free before each emitted symbol.
const OUTPUT_HEADROOM_BITS: u64 = 16;

/// State of the dictionary section parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DictState {
    /// Expecting a header record.
    Header,
    /// Consuming `remaining` entries of `length` bits each.
    Group { remaining: u8, length: u8 },
    /// Stop record read; the payload starts here.
    Stop,
}

/// Result of parsing the dictionary section.
enum Section<S: Symbol> {
    /// First flag bit was `0`: everything after it is raw.
    Passthrough,
    /// A dictionary and the tree rebuilt from it.
    Coded {
        dictionary: Dictionary<S>,
        tree: CodeTree<S>,
    },
}

impl<S: Symbol> HuffmanCodec<S> {
    /// Decode a stream produced by [`encode`](Self::encode).
    pub fn decode(&mut self, stream: &EncodedStream) -> Result<Vec<u8>> {
        self.decode_bits(&stream.data, stream.bit_len)
    }

    /// Decode the first `bit_len` bits of `data`.
    pub fn decode_bits(&mut self, data: &[u8], bit_len: u64) -> Result<Vec<u8>> {
        let mut reader = BitReader::new(data).with_limit(bit_len);
        self.decode_reader(&mut reader, None)
    }

    /// Decode a stream and hand the output over as a reader, without copying.
    pub fn decode_into_reader(&mut self, stream: EncodedStream) -> Result<BitReader<'static>> {
        let mut reader = stream.into_reader();
        let output = self.decode_reader(&mut reader, None)?;
        Ok(BitReader::from_vec(output))
    }

    /// Decode from `reader` until its valid range is exhausted.
    ///
    /// `expected_len` is the decoded size in bytes, if known; it only seeds
    /// the output capacity.
    ///
    /// # Errors
    ///
    /// - [`OxiHuffError::TruncatedDictionary`] if the dictionary section runs
    ///   past the valid range
    /// - [`OxiHuffError::InvalidDictionary`] for conflicting entries
    /// - [`OxiHuffError::InvalidHuffmanCode`] if the payload leaves the tree
    /// - [`OxiHuffError::TruncatedPayload`] if the range ends inside a
    ///   codeword
    pub fn decode_reader(
        &mut self,
        reader: &mut BitReader<'_>,
        expected_len: Option<usize>,
    ) -> Result<Vec<u8>> {
        self.reset();

        match Self::read_dictionary(reader)? {
            Section::Passthrough => Ok(Self::copy_raw(reader)),
            Section::Coded { dictionary, tree } => {
                let output = if tree.is_degenerate() {
                    tracing::warn!(
                        symbol = ?tree.symbol(tree.root()),
                        "dictionary describes a single leaf root, treating payload as raw"
                    );
                    Self::copy_raw(reader)
                } else {
                    Self::walk_payload(&tree, reader, expected_len)?
                };
                self.tree = Some(tree);
                self.dictionary = Some(dictionary);
                Ok(output)
            }
        }
    }

    /// Run the `Header -> Group -> Header ... -> Stop` state machine.
    fn read_dictionary(reader: &mut BitReader<'_>) -> Result<Section<S>> {
        let start = reader.position();
        let mut dictionary = Dictionary::new();
        let mut tree = CodeTree::new();
        let mut groups = 0usize;
        let mut state = DictState::Header;

        loop {
            state = match state {
                DictState::Header => {
                    let record = HeaderRecord::read_from(reader)?;
                    if !record.has_more {
                        DictState::Stop
                    } else {
                        groups += 1;
                        DictState::Group {
                            remaining: record.group_size,
                            length: record.codeword_length,
                        }
                    }
                }
                DictState::Group { remaining: 0, .. } => DictState::Header,
                DictState::Group { remaining, length } => {
                    let entry_bits = u64::from(S::BITS) + u64::from(length);
                    if reader.remaining_bits() < entry_bits {
                        return Err(OxiHuffError::truncated_dictionary(reader.position()));
                    }
                    let symbol = S::from_bits(reader.get(S::BITS));
                    let codeword = Codeword::new(reader.get(length), length);
                    dictionary.insert(symbol, codeword)?;
                    tree.insert(symbol, codeword)?;
                    DictState::Group {
                        remaining: remaining - 1,
                        length,
                    }
                }
                DictState::Stop => break,
            };
        }

        if groups == 0 {
            return Ok(Section::Passthrough);
        }

        tracing::debug!(
            groups,
            entries = dictionary.len(),
            dictionary_bits = reader.position() - start,
            "parsed dictionary"
        );
        Ok(Section::Coded { dictionary, tree })
    }

    /// Copy every whole symbol left in `reader`.
    fn copy_raw(reader: &mut BitReader<'_>) -> Vec<u8> {
        let symbol_bits = u64::from(S::BITS);
        let count = (reader.remaining_bits() / symbol_bits * symbol_bits / 8) as usize;

        let mut output = Vec::with_capacity(count);
        match reader.aligned_remainder() {
            Some(rest) if rest.len() >= count => {
                output.extend_from_slice(&rest[..count]);
                reader.skip(count as u64 * 8);
            }
            _ => reader.read_bytes(count, &mut output),
        }
        output
    }

    /// Walk the tree once per symbol until the valid range is exhausted.
    fn walk_payload(
        tree: &CodeTree<S>,
        reader: &mut BitReader<'_>,
        expected_len: Option<usize>,
    ) -> Result<Vec<u8>> {
        // Every symbol costs at least one payload bit.
        let ceiling = reader
            .remaining_bits()
            .saturating_mul(u64::from(S::BITS))
            .div_ceil(8);
        let estimate = match expected_len {
            Some(len) => (len as u64).min(ceiling),
            None => reader.remaining_bits() / 4,
        };
        let mut output = BitWriter::with_capacity(usize::try_from(estimate).unwrap_or(usize::MAX));
        let root = tree.root();

        while !reader.is_exhausted() {
            let start = reader.position();
            let mut node = root;
            let symbol = loop {
                if reader.is_exhausted() {
                    return Err(OxiHuffError::truncated_payload(start));
                }
                let bit = reader.get_bit();
                let Some(next) = tree.child(node, bit) else {
                    return Err(OxiHuffError::invalid_huffman(reader.position() - 1));
                };
                if let Some(symbol) = tree.symbol(next) {
                    break symbol;
                }
                node = next;
            };

            if output.headroom_bits() < OUTPUT_HEADROOM_BITS {
                output.resize(0);
            }
            output.put(S::BITS, symbol.to_bits());
        }

        Ok(output.into_bytes())
    }
}
