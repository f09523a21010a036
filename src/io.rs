use glob::{glob_with, MatchOptions, Pattern};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

const OUTPUT_EXTENSION: &str = "txt";

/// Write one line per entry to `destination`, newline-terminated.
///
/// Any extension other than `.txt` on `destination` is replaced by `.txt`.
/// Returns the path actually written.
pub fn save_to_txt_file(lines: &[String], destination: &Path) -> Result<PathBuf> {
    let destination = if destination.extension().is_some_and(|ext| ext == OUTPUT_EXTENSION) {
        destination.to_path_buf()
    } else {
        destination.with_extension(OUTPUT_EXTENSION)
    };

    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&destination)?);
        for line in lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    };
    write().map_err(|source| ConvertError::Write {
        path: destination.clone(),
        source,
    })?;

    debug!("Saved {} lines to {}", lines.len(), destination.display());
    Ok(destination)
}

/// The path must exist and be readable.
pub fn check_readable(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| ConvertError::path(path, e.to_string()))?;
    let readable = if metadata.is_dir() {
        fs::read_dir(path).map(|_| ())
    } else {
        File::open(path).map(|_| ())
    };
    readable.map_err(|e| ConvertError::path(path, format!("not readable: {}", e)))
}

pub fn check_destination_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConvertError::path(path, "not an existing directory"))
    }
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

pub fn check_extension(path: &Path, extension: &str) -> Result<()> {
    if has_extension(path, extension) {
        Ok(())
    } else {
        Err(ConvertError::format(
            path,
            format!("expected a .{} file", extension),
        ))
    }
}

/// Files directly inside `dir` with the given extension, case-insensitive,
/// sorted by path.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        extension
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    let mut files: Vec<PathBuf> = glob_with(&pattern, options)
        .map_err(|e| ConvertError::path(dir, e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
