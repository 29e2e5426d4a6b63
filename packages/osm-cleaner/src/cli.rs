//! Command-line interface for the converter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::audit::{audit_file, AuditReport};
use crate::converter::{output_path, process_map_to};
use crate::error::{ConverterError, Result};
use crate::json::JsonFormat;

/// OSM cleaner - Convert OpenStreetMap XML into cleaned line-delimited JSON.
#[derive(Parser)]
#[command(name = "osm-cleaner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an OSM XML file to JSON documents.
    Convert {
        /// Path to the OSM XML file
        input: PathBuf,

        /// Write minified JSON, one document per line
        #[arg(short, long)]
        compact: bool,

        /// Output file (default: <INPUT>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report tag key shapes and unexpected street types.
    Audit {
        /// Path to the OSM XML file
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            compact,
            output,
        } => convert_command(&input, compact, output.as_deref()),
        Commands::Audit { input, json } => audit_command(&input, json),
    }
}

/// Check that the input exists and is a file before doing any work.
fn validate_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file does not exist: {}", input.display()),
        )));
    }
    Ok(())
}

/// Refuse an output path that resolves to the input file.
fn validate_output(input: &Path, output: &Path) -> Result<()> {
    let Ok(resolved) = output.canonicalize() else {
        // Not created yet, so it cannot be the input
        return Ok(());
    };
    if resolved == input.canonicalize()? {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output file would overwrite the input: {}", output.display()),
        )));
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the convert command.
fn convert_command(input: &Path, compact: bool, output: Option<&Path>) -> Result<()> {
    validate_input(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let output = output.map_or_else(|| output_path(input), Path::to_path_buf);
    validate_output(input, &output)?;

    println!(
        "{} {}",
        style("Converting").bold(),
        style(input.display()).cyan()
    );

    let pb = spinner("Shaping elements...");
    let result = process_map_to(input, &output, format);
    pb.finish_and_clear();
    let data = result?;

    println!("  Records: {}", style(data.len()).green());
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output.display()
    );

    Ok(())
}

/// Execute the audit command.
fn audit_command(input: &Path, json: bool) -> Result<()> {
    validate_input(input)?;

    let pb = spinner("Auditing elements...");
    let result = audit_file(input);
    pb.finish_and_clear();
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AuditReport) {
    println!("{}", style("Elements").bold());
    for (tag, count) in &report.element_counts {
        println!("  {tag}: {count}");
    }

    println!("{}", style("Tag keys").bold());
    for (kind, count) in &report.key_types {
        println!("  {kind:?}: {count}");
    }

    if report.unexpected_street_types.is_empty() {
        println!("{}", style("No unexpected street types").green());
        return;
    }

    println!("{}", style("Unexpected street types").yellow().bold());
    for (kind, streets) in &report.unexpected_street_types {
        println!("  {}:", style(kind).yellow());
        for street in streets {
            println!("    {street}");
        }
    }
}
