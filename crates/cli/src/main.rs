//! CLI tool for converting PowerPoint guides to PDF.
//!
//! Reads presentations from `guide_source/`, writes PDFs to
//! `public/guides/` and lists them in `public/guides/list.json`.

use anyhow::{Context, Result};
use clap::Parser;
use guide_core::{ConversionError, GuideConverter, Layout, Progress, RunOutcome, RunReport};
use guide_office::{create_backend, BackendKind};
use std::path::PathBuf;

const RULE: &str = "--------------------------------------------------";

/// Convert PowerPoint guides to PDF and publish the guide list.
#[derive(Parser, Debug)]
#[command(name = "update-guides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Office application used for conversion (auto, libreoffice, powerpoint)
    #[arg(short, long, default_value = "auto")]
    backend: BackendKind,

    /// Path to the office executable (soffice or powershell)
    #[arg(long)]
    office_path: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let root = std::env::current_dir().context("Failed to determine current directory")?;
    let layout = Layout::from_root(&root);
    let app = create_backend(args.backend, args.office_path.clone());

    let converter = GuideConverter::new(layout, app.as_ref());
    let outcome = converter
        .run_with_progress(print_progress)
        .context("Failed to update guides")?;

    match outcome {
        RunOutcome::SourceCreated { dir } => {
            println!("Created source directory: {}", dir.display());
            println!("Please place your PPTX files in this folder.");
        }
        RunOutcome::NoInputs { dir } => {
            println!("No PowerPoint files found in {}", dir.display());
            println!("Please place your .pptx files there and run this again.");
        }
        RunOutcome::Completed(report) => print_summary(&report),
    }

    Ok(())
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::Found { count } => println!("Found {} PowerPoint files.", count),
        Progress::Skipping { file } => {
            println!("Skipping {} (PDF is up to date)", file.filename)
        }
        Progress::Converting { file } => println!("Converting {}...", file.filename),
        Progress::Converted { output, .. } => println!("  -> Success: {}", output),
        Progress::Failed { file, error } => print_failure(&file.filename, error),
    }
}

fn print_failure(filename: &str, error: &ConversionError) {
    if error.is_unavailable() {
        eprintln!("  -> Error: the office application is not installed or not registered.");
        eprintln!("     (Converting {} requires PowerPoint or LibreOffice: {})", filename, error);
    } else {
        eprintln!("Error during conversion of {}: {}", filename, error);
    }
}

fn print_summary(report: &RunReport) {
    println!("{}", RULE);
    println!("Update complete!");
    println!(
        "Converted {} files ({} newly converted, {} up to date, {} failed).",
        report.entries.len(),
        report.converted.len(),
        report.up_to_date.len(),
        report.failed.len()
    );
    println!("Guide list saved to: {}", report.manifest_path.display());
    println!("{}", RULE);
}
