//! Backend selection.

use crate::libreoffice::LibreOffice;
use crate::powerpoint::PowerPoint;
use guide_core::OfficeApplication;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Which office application performs conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// PowerPoint on Windows, LibreOffice everywhere else.
    #[default]
    Auto,
    /// LibreOffice in headless mode.
    LibreOffice,
    /// Microsoft PowerPoint via COM automation.
    PowerPoint,
}

impl BackendKind {
    /// Replace `Auto` with the platform default.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(windows) => Self::PowerPoint,
            Self::Auto => Self::LibreOffice,
            other => other,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::LibreOffice => "libreoffice",
            Self::PowerPoint => "powerpoint",
        };
        f.write_str(name)
    }
}

/// Unknown backend name.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown backend '{0}' (expected auto, libreoffice or powerpoint)")]
pub struct ParseBackendError(String);

impl FromStr for BackendKind {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "libreoffice" | "soffice" => Ok(Self::LibreOffice),
            "powerpoint" | "ppt" => Ok(Self::PowerPoint),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

/// Build the application for `kind`.
///
/// `executable` overrides discovery of `soffice` (LibreOffice) or
/// `powershell` (PowerPoint).
pub fn create_backend(kind: BackendKind, executable: Option<PathBuf>) -> Box<dyn OfficeApplication> {
    let kind = kind.resolve();
    log::info!("Using {} backend", kind);

    match kind {
        BackendKind::PowerPoint => Box::new(match executable {
            Some(path) => PowerPoint::with_executable(path),
            None => PowerPoint::new(),
        }),
        _ => Box::new(match executable {
            Some(path) => LibreOffice::with_executable(path),
            None => LibreOffice::new(),
        }),
    }
}
