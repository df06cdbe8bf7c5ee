//! Finding office executables on disk.

use std::path::{Path, PathBuf};

/// Find the first of `names` on `PATH`, then try the well-known install
/// locations in `fallbacks`.
pub fn find_executable(names: &[&str], fallbacks: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .find_map(|name| which::which(name).ok())
        .or_else(|| find_installed(fallbacks))
}

fn find_installed(fallbacks: &[&str]) -> Option<PathBuf> {
    fallbacks
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_install_location_fallback() {
        let temp = assert_fs::TempDir::new().unwrap();
        let installed = temp.child("program/soffice");
        installed.write_str("").unwrap();
        let fallback = installed.path().to_string_lossy().to_string();

        let found = find_executable(&["definitely-not-an-office-suite"], &[fallback.as_str()]);

        assert_eq!(found, Some(installed.path().to_path_buf()));
    }

    #[test]
    fn test_install_location_must_be_a_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("program/soffice").create_dir_all().unwrap();
        let fallback = temp.child("program/soffice").path().to_string_lossy().to_string();

        assert_eq!(find_installed(&[fallback.as_str()]), None);
    }

    #[test]
    fn test_missing_executable() {
        assert_eq!(
            find_executable(&["definitely-not-an-office-suite"], &["/nonexistent/soffice"]),
            None
        );
    }
}
