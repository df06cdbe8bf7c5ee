//! Core types and batch logic for converting PowerPoint guides to PDF.
//!
//! The office application that performs the actual conversion sits behind
//! the [`OfficeApplication`] interface, so discovery, the staleness check
//! and manifest assembly can run against any implementation.

pub mod automation;
pub mod discover;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod runner;
pub mod staleness;
pub mod types;

pub use automation::{convert_presentation, OfficeApplication, OfficeSession, OpenDocument};
pub use discover::{discover_inputs, Discovery};
pub use error::{ConversionError, Error, Result};
pub use layout::Layout;
pub use manifest::{render_manifest, write_manifest};
pub use runner::{GuideConverter, Progress, RunOutcome, RunReport};
pub use staleness::{check_staleness, Staleness};
pub use types::{GuideEntry, PresentationFormat, SourceFile};
