//! Test command implementation.

use super::decompress::decompress_any;
use std::fs;
use std::path::PathBuf;

pub fn cmd_test(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut ok_count = 0usize;
    let mut errors: Vec<(String, String)> = Vec::new();

    for path in files {
        let name = path.display().to_string();
        let result = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| decompress_any(&data).map_err(|e| e.to_string()));

        match result {
            Ok(decoded) => {
                ok_count += 1;
                println!("  OK: {} ({} bytes)", name, decoded.len());
            }
            Err(e) => {
                println!("  FAILED: {} - {}", name, e);
                errors.push((name, e));
            }
        }
    }

    println!();
    println!(
        "Tested {} files: {} OK, {} failed",
        files.len(),
        ok_count,
        errors.len()
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} files failed", errors.len(), files.len()).into())
    }
}
