//! Interface to the office application that performs conversions.
//!
//! A conversion is always the same four steps: launch the application,
//! open the presentation, export it as PDF, then close the document and
//! quit the application. [`convert_presentation`] drives those steps and
//! releases the document and the session on every exit path.

use crate::error::ConversionError;
use std::path::{Path, PathBuf};

/// An installed office application that can be launched.
pub trait OfficeApplication {
    /// Human-readable name used in log messages.
    fn name(&self) -> &str;

    /// Start a fresh application session.
    ///
    /// Fails with [`ConversionError::Unavailable`] if the application is
    /// not installed or cannot be started.
    fn launch(&self) -> Result<Box<dyn OfficeSession>, ConversionError>;
}

/// A running application instance, owned for the duration of one file.
pub trait OfficeSession {
    /// Open a presentation without showing a window.
    fn open(&mut self, path: &Path) -> Result<Box<dyn OpenDocument>, ConversionError>;

    /// Terminate the application instance.
    fn quit(self: Box<Self>) -> Result<(), ConversionError>;
}

/// A presentation open in a session.
pub trait OpenDocument {
    /// Save the document as PDF at `output`.
    fn export_pdf(&mut self, output: &Path) -> Result<(), ConversionError>;

    /// Close the document.
    fn close(self: Box<Self>) -> Result<(), ConversionError>;
}

/// Convert one presentation to PDF.
///
/// Both paths are made absolute before they reach the application. Close
/// and quit failures are logged at debug level and otherwise ignored; the
/// result reflects only the launch, open and export steps.
pub fn convert_presentation(
    app: &dyn OfficeApplication,
    source: &Path,
    target: &Path,
) -> Result<(), ConversionError> {
    let source = absolute(source);
    let target = absolute(target);

    if !source.exists() {
        return Err(ConversionError::MissingInput(source));
    }

    let mut session = app.launch()?;
    let result = export_in_session(session.as_mut(), &source, &target);

    if let Err(e) = session.quit() {
        log::debug!("Ignoring failure to quit {}: {}", app.name(), e);
    }

    result
}

fn export_in_session(
    session: &mut dyn OfficeSession,
    source: &Path,
    target: &Path,
) -> Result<(), ConversionError> {
    let mut document = session.open(source)?;
    let result = document.export_pdf(target);

    if let Err(e) = document.close() {
        log::debug!("Ignoring failure to close {}: {}", source.display(), e);
    }

    result
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
