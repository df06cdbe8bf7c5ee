//! Discovery of source presentations.

use crate::error::{Error, Result};
use crate::types::SourceFile;
use std::fs;
use std::path::Path;

/// What was found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The directory did not exist and has just been created.
    Created,

    /// The directory exists; these presentations were found (possibly none),
    /// sorted by file name.
    Found(Vec<SourceFile>),
}

/// List the `.pptx` / `.ppt` files in `source_dir`.
///
/// A missing directory is created and reported as [`Discovery::Created`].
pub fn discover_inputs(source_dir: &Path) -> Result<Discovery> {
    if !source_dir.exists() {
        fs::create_dir_all(source_dir).map_err(|e| Error::io(source_dir, e))?;
        log::debug!("Created source directory {}", source_dir.display());
        return Ok(Discovery::Created);
    }

    let entries = fs::read_dir(source_dir).map_err(|e| Error::io(source_dir, e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(source_dir, e))?;

        // fs::metadata follows symlinks
        let is_file = fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!(
                "Skipping {} (file name is not valid UTF-8)",
                entry.path().display()
            );
            continue;
        };

        if let Some(source) = SourceFile::new(source_dir, name) {
            files.push(source);
        }
    }

    // read_dir order differs between platforms
    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(Discovery::Found(files))
}
