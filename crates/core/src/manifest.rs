//! The `list.json` guide manifest.

use crate::error::{Error, Result};
use crate::types::GuideEntry;
use std::fs;
use std::path::Path;

/// Render entries as an indented JSON array.
pub fn render_manifest(entries: &[GuideEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Write `entries` to `path`, replacing whatever was there.
pub fn write_manifest(path: &Path, entries: &[GuideEntry]) -> Result<()> {
    let json = render_manifest(entries)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}
