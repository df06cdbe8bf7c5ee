//! Modification-time staleness check.
//!
//! A PDF counts as current only when its mtime is strictly later than its
//! source's. This is a heuristic: clock skew or writes within the same
//! timestamp tick can make a stale PDF look current.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Whether a target PDF must be (re)generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// No PDF exists yet.
    Missing,
    /// The PDF exists but is not newer than the source.
    Stale,
    /// The PDF is newer than the source.
    Current,
}

impl Staleness {
    /// Whether the source has to be converted.
    pub fn needs_conversion(self) -> bool {
        !matches!(self, Self::Current)
    }
}

/// Compare `source` and `target` modification times.
///
/// Unreadable timestamps count as stale so the file is converted again.
pub fn check_staleness(source: &Path, target: &Path) -> Staleness {
    if !target.exists() {
        return Staleness::Missing;
    }

    match (modified(source), modified(target)) {
        (Some(src), Some(tgt)) if tgt > src => Staleness::Current,
        (Some(_), Some(_)) => Staleness::Stale,
        _ => {
            log::debug!(
                "Could not read modification times for {} / {}",
                source.display(),
                target.display()
            );
            Staleness::Stale
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::fs::File;
    use std::time::Duration;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_missing_target() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("Intro.pptx");
        source.write_str("x").unwrap();

        let result = check_staleness(source.path(), temp.child("Intro.pdf").path());
        assert_eq!(result, Staleness::Missing);
        assert!(result.needs_conversion());
    }

    #[test]
    fn test_newer_target_is_current() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("Intro.pptx");
        let target = temp.child("Intro.pdf");
        source.write_str("x").unwrap();
        target.write_str("pdf").unwrap();

        let now = SystemTime::now();
        set_mtime(source.path(), now - Duration::from_secs(60));
        set_mtime(target.path(), now);

        let result = check_staleness(source.path(), target.path());
        assert_eq!(result, Staleness::Current);
        assert!(!result.needs_conversion());
    }

    #[test]
    fn test_equal_timestamps_are_stale() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("Intro.pptx");
        let target = temp.child("Intro.pdf");
        source.write_str("x").unwrap();
        target.write_str("pdf").unwrap();

        let when = SystemTime::now() - Duration::from_secs(3600);
        set_mtime(source.path(), when);
        set_mtime(target.path(), when);

        assert_eq!(check_staleness(source.path(), target.path()), Staleness::Stale);
    }

    #[test]
    fn test_older_target_is_stale() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("Intro.pptx");
        let target = temp.child("Intro.pdf");
        source.write_str("x").unwrap();
        target.write_str("pdf").unwrap();

        let now = SystemTime::now();
        set_mtime(source.path(), now);
        set_mtime(target.path(), now - Duration::from_secs(60));

        assert_eq!(check_staleness(source.path(), target.path()), Staleness::Stale);
    }
}
