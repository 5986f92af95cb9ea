//! Info command implementation.

use crate::utils::percent;
use oxihuff_codec::{Codeword, FrameHeader, HuffmanCodec, StreamMode, Symbol, decompress_frame};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A dictionary entry in JSON output.
#[derive(Debug, Serialize)]
struct CodewordJson {
    symbol: u32,
    code: String,
}

impl<S: Symbol> From<(S, Codeword)> for CodewordJson {
    fn from((symbol, codeword): (S, Codeword)) -> Self {
        Self {
            symbol: symbol.to_bits(),
            code: codeword.to_string(),
        }
    }
}

/// JSON output for frame information.
#[derive(Debug, Serialize)]
struct FrameInfoJson {
    file: String,
    size: u64,
    symbol_bits: u8,
    mode: String,
    original_size: u64,
    stream_bits: u64,
    ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dictionary_bits: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_code_length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    codewords: Option<Vec<CodewordJson>>,
    /// Leaf paths in tree order, left branch first.
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<Vec<CodewordJson>>,
}

/// What a decode reveals about the code in a frame.
struct Inspection {
    entries: usize,
    dictionary_bits: u64,
    max_code_length: u8,
    dictionary_text: String,
    tree_text: String,
    codewords: Vec<CodewordJson>,
    tree_paths: Vec<CodewordJson>,
}

fn inspect<S: Symbol>(data: &[u8]) -> oxihuff_codec::Result<Option<Inspection>> {
    let mut codec = HuffmanCodec::<S>::default();
    decompress_frame(&mut codec, data)?;

    let (Some(dictionary), Some(tree)) = (codec.dictionary(), codec.tree()) else {
        return Ok(None);
    };

    Ok(Some(Inspection {
        entries: dictionary.len(),
        dictionary_bits: dictionary.serialized_bits(),
        max_code_length: dictionary.max_length(),
        dictionary_text: dictionary.to_string(),
        tree_text: tree.to_string(),
        codewords: dictionary.iter().map(CodewordJson::from).collect(),
        tree_paths: tree.codewords().into_iter().map(CodewordJson::from).collect(),
    }))
}

fn frame_info_json(
    file: &Path,
    size: u64,
    header: &FrameHeader,
    inspection: Option<Inspection>,
    show_dictionary: bool,
    show_tree: bool,
) -> FrameInfoJson {
    let mut output = FrameInfoJson {
        file: file.display().to_string(),
        size,
        symbol_bits: header.symbol_bits,
        mode: header.mode.to_string(),
        original_size: header.original_len,
        stream_bits: header.stream_bits,
        ratio: percent(size, header.original_len),
        dictionary_entries: None,
        dictionary_bits: None,
        max_code_length: None,
        codewords: None,
        tree: None,
    };

    if let Some(info) = inspection {
        output.dictionary_entries = Some(info.entries);
        output.dictionary_bits = Some(info.dictionary_bits);
        output.max_code_length = Some(info.max_code_length);
        output.codewords = show_dictionary.then_some(info.codewords);
        output.tree = show_tree.then_some(info.tree_paths);
    }
    output
}

pub fn cmd_info(
    file: &Path,
    json: bool,
    show_dictionary: bool,
    show_tree: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let header = FrameHeader::parse(&data)?;

    let inspection = match header.symbol_bits {
        16 => inspect::<u16>(&data)?,
        _ => inspect::<u8>(&data)?,
    };

    if json {
        let output = frame_info_json(
            file,
            data.len() as u64,
            &header,
            inspection,
            show_dictionary,
            show_tree,
        );
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Frame Information");
    println!("=================");
    println!("File: {}", file.display());
    println!("Size: {} bytes", data.len());
    println!("Symbol width: {} bits", header.symbol_bits);
    println!("Mode: {}", header.mode);
    println!("Original size: {} bytes", header.original_len);
    println!("Stream: {} bits", header.stream_bits);
    println!(
        "Compression ratio: {:.1}%",
        percent(data.len() as u64, header.original_len)
    );

    match &inspection {
        Some(info) => {
            println!();
            println!("Dictionary:");
            println!("  Entries: {}", info.entries);
            println!("  Table overhead: {} bits", info.dictionary_bits);
            println!("  Longest codeword: {} bits", info.max_code_length);
        }
        None if header.mode == StreamMode::Passthrough => {
            println!();
            println!("Stored verbatim (no dictionary)");
        }
        None => {}
    }

    if let Some(info) = &inspection {
        if show_dictionary {
            println!();
            print!("{}", info.dictionary_text);
        }
        if show_tree {
            println!();
            print!("{}", info.tree_text);
        }
    }

    Ok(())
}
