//! Office-suite backends for presentation-to-PDF conversion.
//!
//! Two applications are supported: LibreOffice, driven in headless mode
//! through `soffice`, and Microsoft PowerPoint, driven through its COM
//! automation interface from Windows PowerShell.

pub mod backend;
pub mod libreoffice;
pub mod locate;
pub mod powerpoint;
pub mod sniff;

pub use backend::{create_backend, BackendKind, ParseBackendError};
pub use libreoffice::LibreOffice;
pub use powerpoint::PowerPoint;
pub use sniff::ensure_presentation;
