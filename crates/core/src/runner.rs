//! Sequential batch conversion of the guide source directory.

use crate::automation::{convert_presentation, OfficeApplication};
use crate::discover::{discover_inputs, Discovery};
use crate::error::{ConversionError, Error, Result};
use crate::layout::Layout;
use crate::manifest::write_manifest;
use crate::staleness::check_staleness;
use crate::types::{GuideEntry, SourceFile};
use std::fs;
use std::path::PathBuf;

/// Per-file progress reported while a run is under way.
#[derive(Debug)]
pub enum Progress<'a> {
    /// Candidates were found in the source directory.
    Found { count: usize },
    /// The PDF is newer than its source; no conversion needed.
    Skipping { file: &'a SourceFile },
    /// A conversion is about to start.
    Converting { file: &'a SourceFile },
    /// A conversion finished and produced `output`.
    Converted { file: &'a SourceFile, output: &'a str },
    /// A conversion failed; the file is left out of the manifest.
    Failed {
        file: &'a SourceFile,
        error: &'a ConversionError,
    },
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Manifest entries, in processing order.
    pub entries: Vec<GuideEntry>,

    /// Source file names converted in this run.
    pub converted: Vec<String>,

    /// Source file names whose PDF was already up to date.
    pub up_to_date: Vec<String>,

    /// Source file names whose conversion failed.
    pub failed: Vec<String>,

    /// Where the manifest was written.
    pub manifest_path: PathBuf,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source directory was missing and has been created.
    SourceCreated { dir: PathBuf },

    /// The source directory holds no presentations.
    NoInputs { dir: PathBuf },

    /// Every candidate was processed and the manifest written.
    Completed(RunReport),
}

/// Converts every presentation in a [`Layout`] and publishes the guide list.
pub struct GuideConverter<'a> {
    layout: Layout,
    app: &'a dyn OfficeApplication,
}

impl<'a> GuideConverter<'a> {
    /// Create a converter for `layout` using `app` for conversions.
    pub fn new(layout: Layout, app: &'a dyn OfficeApplication) -> Self {
        Self { layout, app }
    }

    /// Run the batch without progress reporting.
    pub fn run(&self) -> Result<RunOutcome> {
        self.run_with_progress(|_| {})
    }

    /// Run the batch, calling `on_progress` for each step.
    ///
    /// Only directory and manifest I/O errors are returned; a failed
    /// conversion drops that file from the manifest and the run continues.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<RunOutcome>
    where
        F: FnMut(Progress<'_>),
    {
        let sources = match discover_inputs(&self.layout.source_dir)? {
            Discovery::Created => {
                return Ok(RunOutcome::SourceCreated {
                    dir: self.layout.source_dir.clone(),
                })
            }
            Discovery::Found(sources) => sources,
        };

        fs::create_dir_all(&self.layout.target_dir)
            .map_err(|e| Error::io(&self.layout.target_dir, e))?;

        if sources.is_empty() {
            return Ok(RunOutcome::NoInputs {
                dir: self.layout.source_dir.clone(),
            });
        }

        on_progress(Progress::Found {
            count: sources.len(),
        });

        let mut report = RunReport {
            manifest_path: self.layout.manifest_path.clone(),
            ..RunReport::default()
        };

        for source in &sources {
            self.process(source, &mut report, &mut on_progress);
        }

        write_manifest(&self.layout.manifest_path, &report.entries)?;
        log::debug!(
            "Wrote {} entries to {}",
            report.entries.len(),
            self.layout.manifest_path.display()
        );

        Ok(RunOutcome::Completed(report))
    }

    fn process<F>(&self, source: &SourceFile, report: &mut RunReport, on_progress: &mut F)
    where
        F: FnMut(Progress<'_>),
    {
        let target = source.target_path(&self.layout.target_dir);
        let staleness = check_staleness(&source.path, &target);
        log::debug!("{}: {:?}", source.filename, staleness);

        if !staleness.needs_conversion() {
            on_progress(Progress::Skipping { file: source });
            report.up_to_date.push(source.filename.clone());
            report.entries.push(GuideEntry::for_source(source));
            return;
        }

        on_progress(Progress::Converting { file: source });

        match convert_presentation(self.app, &source.path, &target) {
            Ok(()) => {
                let entry = GuideEntry::for_source(source);
                on_progress(Progress::Converted {
                    file: source,
                    output: &entry.filename,
                });
                report.converted.push(source.filename.clone());
                report.entries.push(entry);
            }
            Err(error) => {
                on_progress(Progress::Failed {
                    file: source,
                    error: &error,
                });
                report.failed.push(source.filename.clone());
            }
        }
    }
}
