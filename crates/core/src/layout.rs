//! Fixed directory layout relative to the working directory.

use std::path::{Path, PathBuf};

/// Directory holding the source presentations.
pub const SOURCE_DIR: &str = "guide_source";

/// Manifest file name inside the target directory.
pub const MANIFEST_FILE: &str = "list.json";

/// Where presentations are read from and guides are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// `<root>/guide_source`
    pub source_dir: PathBuf,

    /// `<root>/public/guides`
    pub target_dir: PathBuf,

    /// `<root>/public/guides/list.json`
    pub manifest_path: PathBuf,
}

impl Layout {
    /// Build the conventional layout under `root` (usually the cwd).
    pub fn from_root(root: &Path) -> Self {
        let target_dir = root.join("public").join("guides");
        Self {
            source_dir: root.join(SOURCE_DIR),
            manifest_path: target_dir.join(MANIFEST_FILE),
            target_dir,
        }
    }
}
