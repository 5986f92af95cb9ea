//! Decompress command implementation.

use crate::utils::{copy_mtime, create_progress_bar, decompressed_path};
use oxihuff_codec::{FrameHeader, HuffmanCodec, decompress_frame};
use std::fs;
use std::path::{Path, PathBuf};

/// Decompress a frame of either symbol width.
pub fn decompress_any(data: &[u8]) -> oxihuff_codec::Result<Vec<u8>> {
    let header = FrameHeader::parse(data)?;
    match header.symbol_bits {
        16 => decompress_frame(&mut HuffmanCodec::<u16>::default(), data),
        _ => decompress_frame(&mut HuffmanCodec::<u8>::default(), data),
    }
}

pub fn cmd_decompress(
    files: &[PathBuf],
    output: Option<&Path>,
    keep_mtime: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let multiple = files.len() > 1;
    if let Some(dir) = output.filter(|_| multiple) {
        fs::create_dir_all(dir)?;
    }

    let pb = create_progress_bar(files.len() as u64, multiple);
    for path in files {
        pb.set_message(path.display().to_string());

        let data = fs::read(path)?;
        let decoded = decompress_any(&data).map_err(|e| format!("{}: {}", path.display(), e))?;

        let target = decompressed_path(path, output, multiple);
        fs::write(&target, &decoded)?;
        if keep_mtime {
            copy_mtime(path, &target)?;
        }

        pb.suspend(|| {
            println!(
                "{} -> {} ({} bytes)",
                path.display(),
                target.display(),
                decoded.len()
            );
        });
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(())
}
