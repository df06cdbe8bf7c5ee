//! Leading-bytes check shared by every backend's `open`.

use guide_core::{ConversionError, PresentationFormat};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Check that `path` starts like a presentation container.
///
/// Only the magic bytes count: a `.pptx` must be a ZIP archive and a `.ppt`
/// an OLE compound file. The extension is not consulted, so a text file
/// renamed to `.pptx` is rejected before the office application sees it.
pub fn ensure_presentation(path: &Path) -> Result<PresentationFormat, ConversionError> {
    let mut file = File::open(path)
        .map_err(|e| ConversionError::Open(format!("cannot read {}: {}", path.display(), e)))?;

    let mut magic = [0u8; 8];
    let mut filled = 0;
    while filled < magic.len() {
        let read = file
            .read(&mut magic[filled..])
            .map_err(|e| ConversionError::Open(format!("cannot read {}: {}", path.display(), e)))?;
        if read == 0 {
            break;
        }
        filled += read;
    }

    PresentationFormat::from_magic(&magic[..filled]).ok_or_else(|| {
        ConversionError::Open(format!("{} is not a PowerPoint file", path.display()))
    })
}
