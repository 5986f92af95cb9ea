//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of compressed files.
pub const EXTENSION: &str = "ohf";

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    match ProgressStyle::default_bar().template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        Ok(style) => pb.set_style(style.progress_chars("█▓▒░ ")),
        Err(err) => tracing::debug!(%err, "falling back to the default progress style"),
    }
    pb
}

/// Where to write the frame for `input`.
///
/// With several inputs `output` names a directory; with one it names the file.
pub fn compressed_path(input: &Path, output: Option<&Path>, multiple: bool) -> PathBuf {
    let mut name: OsString = input.file_name().unwrap_or(input.as_os_str()).to_owned();
    name.push(".");
    name.push(EXTENSION);

    match output {
        Some(dir) if multiple => dir.join(name),
        Some(file) => file.to_path_buf(),
        None => input.with_file_name(name),
    }
}

/// Where to write the data decompressed from `input`.
///
/// Strips a trailing `.ohf`; other names get `.out` appended.
pub fn decompressed_path(input: &Path, output: Option<&Path>, multiple: bool) -> PathBuf {
    let name: OsString = match input.extension() {
        Some(ext) if ext == EXTENSION => input.file_stem().unwrap_or(input.as_os_str()).to_owned(),
        _ => {
            let mut name = input.file_name().unwrap_or(input.as_os_str()).to_owned();
            name.push(".out");
            name
        }
    };

    match output {
        Some(dir) if multiple => dir.join(name),
        Some(file) => file.to_path_buf(),
        None => input.with_file_name(name),
    }
}

/// Copy the modification time of `source` onto `target`.
pub fn copy_mtime(source: &Path, target: &Path) -> std::io::Result<()> {
    let metadata = std::fs::metadata(source)?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(target, mtime)
}

/// Output size relative to input, as a percentage.
pub fn percent(output: u64, input: u64) -> f64 {
    if input == 0 {
        100.0
    } else {
        output as f64 / input as f64 * 100.0
    }
}
