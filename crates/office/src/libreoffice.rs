//! LibreOffice backend.
//!
//! Each session gets its own throwaway user profile so a desktop instance
//! the user already has open cannot swallow the headless request. Exports
//! land in a staging directory inside that profile and are then moved to
//! the requested path, because `soffice --convert-to` only takes an output
//! directory.

use crate::locate::find_executable;
use crate::sniff::ensure_presentation;
use guide_core::{ConversionError, OfficeApplication, OfficeSession, OpenDocument};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const EXECUTABLES: &[&str] = &["soffice", "soffice.exe", "libreoffice"];

const INSTALL_LOCATIONS: &[&str] = &[
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    "/opt/libreoffice/program/soffice",
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];

/// LibreOffice driven through `soffice --headless`.
#[derive(Debug, Clone, Default)]
pub struct LibreOffice {
    executable: Option<PathBuf>,
}

impl LibreOffice {
    /// Discover `soffice` on `PATH` or in the usual install locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given `soffice` binary.
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(path.into()),
        }
    }

    fn locate(&self) -> Result<PathBuf, ConversionError> {
        match &self.executable {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(ConversionError::Unavailable(format!(
                "{} does not exist",
                path.display()
            ))),
            None => find_executable(EXECUTABLES, INSTALL_LOCATIONS).ok_or_else(|| {
                ConversionError::Unavailable("soffice was not found on PATH".to_string())
            }),
        }
    }
}

impl OfficeApplication for LibreOffice {
    fn name(&self) -> &str {
        "LibreOffice"
    }

    fn launch(&self) -> Result<Box<dyn OfficeSession>, ConversionError> {
        let executable = self.locate()?;
        let profile = tempfile::Builder::new()
            .prefix("guide-office-")
            .tempdir()
            .map_err(|e| {
                ConversionError::Unavailable(format!("cannot create profile directory: {e}"))
            })?;

        log::debug!(
            "Started LibreOffice session {} with profile {}",
            executable.display(),
            profile.path().display()
        );

        Ok(Box::new(LibreOfficeSession {
            executable,
            profile,
        }))
    }
}

struct LibreOfficeSession {
    executable: PathBuf,
    // Removed on quit, or on drop if quit is never reached.
    profile: TempDir,
}

impl OfficeSession for LibreOfficeSession {
    fn open(&mut self, path: &Path) -> Result<Box<dyn OpenDocument>, ConversionError> {
        let format = ensure_presentation(path)?;
        log::debug!("Opening {} as {:?}", path.display(), format);

        Ok(Box::new(LibreOfficeDocument {
            executable: self.executable.clone(),
            profile_dir: self.profile.path().to_path_buf(),
            staging_dir: self.profile.path().join("out"),
            source: path.to_path_buf(),
        }))
    }

    fn quit(self: Box<Self>) -> Result<(), ConversionError> {
        let session = *self;
        let path = session.profile.path().to_path_buf();
        session.profile.close().map_err(|e| {
            ConversionError::Cleanup(format!("cannot remove profile {}: {}", path.display(), e))
        })
    }
}

struct LibreOfficeDocument {
    executable: PathBuf,
    profile_dir: PathBuf,
    staging_dir: PathBuf,
    source: PathBuf,
}

impl OpenDocument for LibreOfficeDocument {
    fn export_pdf(&mut self, output: &Path) -> Result<(), ConversionError> {
        fs::create_dir_all(&self.staging_dir)
            .map_err(|e| ConversionError::Export(format!("cannot create staging directory: {e}")))?;

        let result = Command::new(&self.executable)
            .arg("--headless")
            .arg("--norestore")
            .arg("--nolockcheck")
            .arg(format!("-env:UserInstallation={}", file_url(&self.profile_dir)))
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&self.staging_dir)
            .arg(&self.source)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    ConversionError::Unavailable(format!(
                        "cannot start {}: {}",
                        self.executable.display(),
                        e
                    ))
                }
                _ => ConversionError::Export(format!("failed to run soffice: {e}")),
            })?;

        if !result.status.success() {
            return Err(ConversionError::Export(format!(
                "soffice exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        let produced = staged_pdf(&self.staging_dir, &self.source);
        if !produced.is_file() {
            return Err(ConversionError::Export(format!(
                "soffice produced no PDF for {}: {}",
                self.source.display(),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        move_file(&produced, output)
            .map_err(|e| ConversionError::Export(format!("cannot write {}: {}", output.display(), e)))
    }

    fn close(self: Box<Self>) -> Result<(), ConversionError> {
        match fs::remove_dir_all(&self.staging_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConversionError::Cleanup(format!(
                "cannot remove staging directory: {e}"
            ))),
        }
    }
}

/// Where `soffice` writes the PDF for `source`.
fn staged_pdf(staging_dir: &Path, source: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(".pdf");
    staging_dir.join(name)
}

fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // rename fails across filesystems
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// `file://` URL for a local directory, as `-env:UserInstallation` expects.
///
/// Every byte of the UTF-8 path outside the URL unreserved set, `/` and
/// `:` is percent-encoded.
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let mut url = String::from("file://");
    if !raw.starts_with('/') {
        url.push('/');
    }
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_file_url() {
        assert_eq!(file_url(Path::new("/tmp/guide office")), "file:///tmp/guide%20office");
        assert_eq!(
            file_url(Path::new(r"C:\Users\me\AppData\Local\Temp\p")),
            "file:///C:/Users/me/AppData/Local/Temp/p"
        );
        assert_eq!(file_url(Path::new("/tmp/a#b%c")), "file:///tmp/a%23b%25c");
    }

    #[test]
    fn test_file_url_encodes_non_ascii() {
        assert_eq!(
            file_url(Path::new("/home/민수/tmp")),
            "file:///home/%EB%AF%BC%EC%88%98/tmp"
        );
    }

    #[test]
    fn test_staged_pdf_name() {
        assert_eq!(
            staged_pdf(Path::new("/p/out"), Path::new("/src/Week 1.pptx")),
            Path::new("/p/out/Week 1.pdf")
        );
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let temp = assert_fs::TempDir::new().unwrap();
        let app = LibreOffice::with_executable(temp.child("soffice").path());

        let err = app.launch().err().unwrap();

        assert!(err.is_unavailable());
    }

    #[test]
    fn test_session_lifecycle_without_export() {
        let temp = assert_fs::TempDir::new().unwrap();
        let exe = temp.child("soffice");
        exe.write_str("").unwrap();
        let deck = temp.child("Intro.pptx");
        deck.write_binary(b"PK\x03\x04....").unwrap();

        let app = LibreOffice::with_executable(exe.path());
        let mut session = app.launch().unwrap();
        let document = session.open(deck.path()).unwrap();
        document.close().unwrap();
        session.quit().unwrap();
    }

    #[test]
    fn test_open_rejects_non_presentation() {
        let temp = assert_fs::TempDir::new().unwrap();
        let exe = temp.child("soffice");
        exe.write_str("").unwrap();
        let deck = temp.child("Notes.pptx");
        deck.write_str("just some text").unwrap();

        let app = LibreOffice::with_executable(exe.path());
        let mut session = app.launch().unwrap();
        let err = session.open(deck.path()).err().unwrap();

        assert!(matches!(err, ConversionError::Open(_)));
        session.quit().unwrap();
    }

    #[test]
    fn test_profile_removed_on_quit_and_on_drop() {
        let temp = assert_fs::TempDir::new().unwrap();
        let exe = temp.child("soffice");
        exe.write_str("").unwrap();

        let session = LibreOfficeSession {
            executable: exe.path().to_path_buf(),
            profile: tempfile::Builder::new().prefix("guide-office-").tempdir().unwrap(),
        };
        let profile = session.profile.path().to_path_buf();
        assert!(profile.is_dir());
        Box::new(session).quit().unwrap();
        assert!(!profile.exists());

        let dropped = LibreOfficeSession {
            executable: exe.path().to_path_buf(),
            profile: tempfile::Builder::new().prefix("guide-office-").tempdir().unwrap(),
        };
        let profile = dropped.profile.path().to_path_buf();
        drop(dropped);
        assert!(!profile.exists());
    }

    #[test]
    fn test_move_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let from = temp.child("out/a.pdf");
        from.write_str("%PDF").unwrap();
        let to = temp.child("a.pdf");

        move_file(from.path(), to.path()).unwrap();

        assert!(!from.path().exists());
        assert_eq!(std::fs::read_to_string(to.path()).unwrap(), "%PDF");
    }
}
