//! Microsoft PowerPoint backend.
//!
//! PowerPoint is only scriptable through COM, so the automation runs as a
//! short Windows PowerShell script per export. The script owns the COM
//! objects for the duration of one file: it opens the presentation without
//! a window, saves it as PDF, then closes the presentation and quits the
//! application in a `finally` block, ignoring failures there. Which step
//! failed comes back as the exit code.

use crate::locate::find_executable;
use crate::sniff::ensure_presentation;
use guide_core::{ConversionError, OfficeApplication, OfficeSession, OpenDocument};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// `ppSaveAsPDF` from the PowerPoint object model.
pub const PP_SAVE_AS_PDF: i32 = 32;

/// `CO_E_CLASSSTRING`: the ProgID is not registered.
const CO_E_CLASSSTRING: &str = "800401F3";
/// `CO_E_CLASSSTRING` as a signed HRESULT.
const CO_E_CLASSSTRING_SIGNED: &str = "-2147221005";
/// `REGDB_E_CLASSNOTREG`: the class is not registered.
const REGDB_E_CLASSNOTREG: &str = "80040154";

const EXIT_UNAVAILABLE: i32 = 3;
const EXIT_OPEN_FAILED: i32 = 4;
const EXIT_EXPORT_FAILED: i32 = 5;

const EXECUTABLES: &[&str] = &["powershell.exe", "pwsh.exe", "powershell", "pwsh"];

const INSTALL_LOCATIONS: &[&str] =
    &[r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe"];

/// Microsoft PowerPoint driven through COM automation.
#[derive(Debug, Clone, Default)]
pub struct PowerPoint {
    shell: Option<PathBuf>,
}

impl PowerPoint {
    /// Discover PowerShell on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given PowerShell executable.
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            shell: Some(path.into()),
        }
    }

    fn locate(&self) -> Result<PathBuf, ConversionError> {
        match &self.shell {
            Some(path) => Ok(path.clone()),
            None => find_executable(EXECUTABLES, INSTALL_LOCATIONS).ok_or_else(|| {
                ConversionError::Unavailable(
                    "Windows PowerShell is required to automate PowerPoint".to_string(),
                )
            }),
        }
    }
}

impl OfficeApplication for PowerPoint {
    fn name(&self) -> &str {
        "Microsoft PowerPoint"
    }

    fn launch(&self) -> Result<Box<dyn OfficeSession>, ConversionError> {
        let shell = self.locate()?;
        Ok(Box::new(PowerPointSession { shell }))
    }
}

struct PowerPointSession {
    shell: PathBuf,
}

impl OfficeSession for PowerPointSession {
    fn open(&mut self, path: &Path) -> Result<Box<dyn OpenDocument>, ConversionError> {
        let format = ensure_presentation(path)?;
        log::debug!("Opening {} as {:?}", path.display(), format);

        Ok(Box::new(PowerPointDocument {
            shell: self.shell.clone(),
            source: path.to_path_buf(),
        }))
    }

    fn quit(self: Box<Self>) -> Result<(), ConversionError> {
        // The script quits PowerPoint itself.
        Ok(())
    }
}

struct PowerPointDocument {
    shell: PathBuf,
    source: PathBuf,
}

impl OpenDocument for PowerPointDocument {
    fn export_pdf(&mut self, output: &Path) -> Result<(), ConversionError> {
        let script = export_script(&self.source, output);

        let result = Command::new(&self.shell)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-ExecutionPolicy")
            .arg("Bypass")
            .arg("-Command")
            .arg(&script)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    ConversionError::Unavailable(format!(
                        "cannot start {}: {}",
                        self.shell.display(),
                        e
                    ))
                }
                _ => ConversionError::Export(format!("failed to run PowerShell: {e}")),
            })?;

        check_output(&result)
    }

    fn close(self: Box<Self>) -> Result<(), ConversionError> {
        Ok(())
    }
}

/// Characters PowerShell accepts as a single-quote delimiter.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote `s` as a PowerShell single-quoted string literal.
///
/// Any quote character is escaped by doubling it.
fn ps_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if SINGLE_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Build the script that exports `source` to `output`.
fn export_script(source: &Path, output: &Path) -> String {
    format!(
        r#"$ErrorActionPreference = 'Stop'
$app = $null
$pres = $null
try {{
    try {{ $app = New-Object -ComObject PowerPoint.Application }}
    catch {{ [Console]::Error.WriteLine($_.Exception.Message); exit {unavailable} }}
    try {{ $pres = $app.Presentations.Open({source}, -1, 0, 0) }}
    catch {{ [Console]::Error.WriteLine($_.Exception.Message); exit {open} }}
    try {{ $pres.SaveAs({output}, {format}) }}
    catch {{ [Console]::Error.WriteLine($_.Exception.Message); exit {export} }}
}}
finally {{
    if ($pres) {{ try {{ $pres.Close() }} catch {{ }} }}
    if ($app) {{ try {{ $app.Quit() }} catch {{ }} }}
}}
exit 0
"#,
        unavailable = EXIT_UNAVAILABLE,
        open = EXIT_OPEN_FAILED,
        export = EXIT_EXPORT_FAILED,
        format = PP_SAVE_AS_PDF,
        source = ps_quote(&source.to_string_lossy()),
        output = ps_quote(&output.to_string_lossy()),
    )
}

fn check_output(output: &Output) -> Result<(), ConversionError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(classify_failure(output.status.code(), stderr))
}

/// Map a script exit code and its stderr to a conversion error.
fn classify_failure(code: Option<i32>, stderr: String) -> ConversionError {
    if is_class_not_registered(&stderr) {
        return ConversionError::Unavailable(format!(
            "PowerPoint is not installed or not registered ({stderr})"
        ));
    }

    match code {
        Some(EXIT_UNAVAILABLE) => ConversionError::Unavailable(stderr),
        Some(EXIT_OPEN_FAILED) => ConversionError::Open(stderr),
        Some(EXIT_EXPORT_FAILED) => ConversionError::Export(stderr),
        Some(code) => ConversionError::Export(format!("PowerShell exited with {code}: {stderr}")),
        None => ConversionError::Export(format!("PowerShell was terminated: {stderr}")),
    }
}

fn is_class_not_registered(message: &str) -> bool {
    let upper = message.to_uppercase();
    upper.contains(CO_E_CLASSSTRING)
        || upper.contains(REGDB_E_CLASSNOTREG)
        || message.contains(CO_E_CLASSSTRING_SIGNED)
        || message.contains("Invalid class string")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_ps_quote_escapes_single_quotes() {
        assert_eq!(ps_quote(r"C:\guides\Intro.pptx"), r"'C:\guides\Intro.pptx'");
        assert_eq!(ps_quote("Bob's deck.pptx"), "'Bob''s deck.pptx'");
    }

    #[test]
    fn test_ps_quote_escapes_typographic_quotes() {
        assert_eq!(ps_quote("Bob\u{2019}s deck.pptx"), "'Bob\u{2019}\u{2019}s deck.pptx'");
        assert_eq!(
            ps_quote("\u{2018}Q1\u{2019} \u{201A}x\u{201B}.pptx"),
            "'\u{2018}\u{2018}Q1\u{2019}\u{2019} \u{201A}\u{201A}x\u{201B}\u{201B}.pptx'"
        );
    }

    #[test]
    fn test_script_opens_without_window_and_saves_pdf() {
        let script = export_script(Path::new("in's.pptx"), Path::new("out.pdf"));

        assert!(script.contains("Presentations.Open('in''s.pptx', -1, 0, 0)"));
        assert!(script.contains("SaveAs('out.pdf', 32)"));
        assert!(script.contains("$pres.Close()"));
        assert!(script.contains("$app.Quit()"));
        assert!(script.contains("finally {"));
    }

    #[test]
    fn test_classify_exit_codes() {
        assert!(classify_failure(Some(3), "boom".into()).is_unavailable());
        assert!(matches!(
            classify_failure(Some(4), "locked".into()),
            ConversionError::Open(_)
        ));
        assert!(matches!(
            classify_failure(Some(5), "disk full".into()),
            ConversionError::Export(_)
        ));
        assert!(matches!(
            classify_failure(Some(1), "syntax".into()),
            ConversionError::Export(_)
        ));
        assert!(matches!(classify_failure(None, String::new()), ConversionError::Export(_)));
    }

    #[test]
    fn test_class_lookup_failures_are_unavailable() {
        let invalid = "Retrieving the COM class factory failed: 0x800401f3 Invalid class string";
        let unregistered = "failed due to the following error: 80040154 Class not registered";
        let signed = "(-2147221005, 'Invalid class string', None, None)";

        assert!(classify_failure(Some(1), invalid.into()).is_unavailable());
        assert!(classify_failure(Some(5), unregistered.into()).is_unavailable());
        assert!(classify_failure(Some(1), signed.into()).is_unavailable());
    }

    #[test]
    fn test_open_checks_leading_bytes() {
        let temp = assert_fs::TempDir::new().unwrap();
        let text = temp.child("Notes.pptx");
        text.write_str("not a deck").unwrap();
        let deck = temp.child("Intro.pptx");
        deck.write_binary(b"PK\x03\x04slides").unwrap();

        let app = PowerPoint::with_executable("powershell.exe");
        let mut session = app.launch().unwrap();

        let err = session.open(text.path()).err().unwrap();
        assert!(matches!(err, ConversionError::Open(_)));
        let document = session.open(deck.path()).unwrap();
        document.close().unwrap();
        session.quit().unwrap();
    }

    #[test]
    fn test_open_rejects_missing_file() {
        let app = PowerPoint::with_executable("powershell.exe");
        let mut session = app.launch().unwrap();
        let err = session.open(Path::new("/nonexistent/deck.pptx")).err().unwrap();
        assert!(matches!(err, ConversionError::Open(_)));
        session.quit().unwrap();
    }
}
