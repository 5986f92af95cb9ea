//! Compress command implementation.

use crate::utils::{compressed_path, copy_mtime, create_progress_bar, percent};
use oxihuff_codec::{FallbackMode, HuffmanCodec, HuffmanConfig, compress_batch_with, compress_frame};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for compressing files.
pub struct CompressOptions {
    pub store: bool,
    pub max_code_length: u8,
    pub wide: bool,
    pub keep_mtime: bool,
}

impl CompressOptions {
    fn config(&self) -> HuffmanConfig {
        let config = HuffmanConfig::new(self.max_code_length);
        if self.store {
            config.with_fallback(FallbackMode::Always)
        } else {
            config
        }
    }
}

pub fn cmd_compress(
    files: &[PathBuf],
    output: Option<&Path>,
    options: &CompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.config();
    let multiple = files.len() > 1;
    if let Some(dir) = output.filter(|_| multiple) {
        fs::create_dir_all(dir)?;
    }

    let inputs = files
        .iter()
        .map(|path| fs::read(path).map_err(|e| format!("{}: {}", path.display(), e)))
        .collect::<Result<Vec<_>, _>>()?;

    // One tick per coded frame
    let pb = create_progress_bar(files.len() as u64, multiple);
    pb.set_message("coding");

    // Byte frames are independent, so they are coded on the rayon pool
    let frames = if options.wide {
        let mut codec = HuffmanCodec::<u16>::new(config)?;
        files
            .iter()
            .zip(&inputs)
            .map(|(path, input)| {
                pb.set_message(path.display().to_string());
                let frame = compress_frame(&mut codec, input)
                    .map_err(|e| format!("{}: {}", path.display(), e))?;
                pb.inc(1);
                Ok::<_, String>(frame)
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let slices: Vec<&[u8]> = inputs.iter().map(Vec::as_slice).collect();
        compress_batch_with(&slices, config, |_| pb.inc(1))?
    };
    pb.finish_and_clear();

    let mut total_in = 0u64;
    let mut total_out = 0u64;

    for ((path, input), frame) in files.iter().zip(&inputs).zip(&frames) {
        let target = compressed_path(path, output, multiple);

        fs::write(&target, frame)?;
        if options.keep_mtime {
            copy_mtime(path, &target)?;
        }

        println!(
            "{} -> {} ({} -> {} bytes, {:.1}%)",
            path.display(),
            target.display(),
            input.len(),
            frame.len(),
            percent(frame.len() as u64, input.len() as u64)
        );
        total_in += input.len() as u64;
        total_out += frame.len() as u64;
    }

    if multiple {
        println!(
            "Compressed {} files: {} -> {} bytes ({:.1}%)",
            files.len(),
            total_in,
            total_out,
            percent(total_out, total_in)
        );
    }
    Ok(())
}
