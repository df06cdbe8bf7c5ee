//! Domain types for source presentations and published guides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension given to every converted guide.
pub const PDF_EXTENSION: &str = "pdf";

/// The format of a source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from a file name such as `Intro.PPTX`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }
}

/// A presentation found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name as listed, e.g. `Intro.pptx`.
    pub filename: String,

    /// File name without its extension; becomes the guide title.
    pub title: String,

    /// Full path to the file.
    pub path: PathBuf,
}

impl SourceFile {
    /// Build a source file from a directory and a listed file name.
    ///
    /// Returns `None` if the name does not carry a presentation extension.
    pub fn new(dir: &Path, filename: impl Into<String>) -> Option<Self> {
        let filename = filename.into();
        PresentationFormat::from_file_name(&filename)?;
        let title = Path::new(&filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            path: dir.join(&filename),
            filename,
            title,
        })
    }

    /// Name of the PDF this file converts to.
    pub fn pdf_filename(&self) -> String {
        format!("{}.{}", self.title, PDF_EXTENSION)
    }

    /// Path of the PDF inside `target_dir`.
    pub fn target_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(self.pdf_filename())
    }
}

/// One published guide in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideEntry {
    /// Display title (source base name).
    pub title: String,

    /// PDF file name relative to the guides directory.
    pub filename: String,
}

impl GuideEntry {
    /// Create the manifest entry for a source file.
    pub fn for_source(source: &SourceFile) -> Self {
        Self {
            title: source.title.clone(),
            filename: source.pdf_filename(),
        }
    }
}
