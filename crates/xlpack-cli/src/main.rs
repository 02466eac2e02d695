//! xlpack CLI - build and inspect report packages

mod sample;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use xlpack::prelude::*;

use crate::sample::customers;

#[derive(Parser)]
#[command(name = "xlpack")]
#[command(author, version, about = "Build and inspect styled XLSX report packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a batch of sample customer reports
    Build {
        /// Directory the packages are written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Customer records per package
        #[arg(short, long, default_value = "10")]
        records: usize,

        /// Number of packages in the batch
        #[arg(short, long, default_value = "1")]
        packages: usize,

        /// Style part: `programmatic` or `predefined:<name>`
        #[arg(short, long, default_value = "programmatic")]
        style: StyleChoice,

        /// Directory holding `<name>.xml` documents for predefined styles
        #[arg(long, default_value = "styles")]
        styles_dir: PathBuf,

        /// Document title recorded in the package properties
        #[arg(long)]
        title: Option<String>,
    },

    /// Show sheets, rows and schema findings of a package
    Inspect {
        /// Package to read
        input: PathBuf,
    },
}

/// Style strategy chosen on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
enum StyleChoice {
    Programmatic,
    Predefined(String),
}

impl FromStr for StyleChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "programmatic" => Ok(StyleChoice::Programmatic),
            Some(("predefined", name)) if !name.is_empty() => {
                Ok(StyleChoice::Predefined(name.to_string()))
            }
            _ => Err(format!(
                "unknown style '{}', expected 'programmatic' or 'predefined:<name>'",
                s
            )),
        }
    }
}

impl StyleChoice {
    fn strategy(&self, styles_dir: &Path) -> Box<dyn StyleStrategy> {
        match self {
            StyleChoice::Programmatic => Box::new(ProgrammaticStyle),
            StyleChoice::Predefined(name) => Box::new(PredefinedStyle::new(
                DirectoryStyles::new(styles_dir),
                name.clone(),
            )),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            output_dir,
            records,
            packages,
            style,
            styles_dir,
            title,
        } => build_batch(&output_dir, records, packages, &style, &styles_dir, title),
        Commands::Inspect { input } => inspect(&input),
    }
}

fn build_batch(
    output_dir: &Path,
    records: usize,
    packages: usize,
    style: &StyleChoice,
    styles_dir: &Path,
    title: Option<String>,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let mut failed = 0;
    for n in 1..=packages {
        let path = output_dir.join(format!("customers-{}.xlsx", n));
        // One failed package does not stop the batch.
        match build_one(&path, n, records, style, styles_dir, title.clone()) {
            Ok(saved) => {
                println!(
                    "Wrote '{}' ({} records, {} schema findings)",
                    saved.path().display(),
                    records,
                    saved.report().len()
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!("{:#}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} packages failed", failed, packages);
    }
    Ok(())
}

fn build_one(
    path: &Path,
    seed: usize,
    records: usize,
    style: &StyleChoice,
    styles_dir: &Path,
    title: Option<String>,
) -> Result<SavedPackage> {
    let mut properties = DocumentProperties::new();
    if let Some(title) = title {
        properties = properties.with_title(title);
    }
    let options = PackageOptions::new().with_properties(properties);
    let customers = customers(records, seed);

    let saved = build_report(
        path,
        options,
        style.strategy(styles_dir),
        &RecordSheet::new("Customers"),
        &customers,
    )
    .map_err(|e| match e {
        XlsxError::Conflict(p) => {
            anyhow::anyhow!("'{}' is in use by another program, skipped", p.display())
        }
        other => anyhow::Error::new(other),
    })
    .with_context(|| format!("Failed to build '{}'", path.display()))?;
    Ok(saved)
}

fn inspect(input: &Path) -> Result<()> {
    let package = XlsxReader::read_file(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    let workbook = &package.workbook;

    println!("File: {}", input.display());
    println!("Parts: {}", package.part_names.len());
    println!("Cell formats: {}", workbook.cell_format_count());
    println!("Sheets: {}", workbook.sheet_count());

    let validator = SchemaValidator::new();
    let report = match workbook.stylesheet() {
        Some(stylesheet) => validator.validate_stylesheet(stylesheet),
        None => ValidationReport::new(),
    };

    for sheet in workbook.sheets() {
        println!();
        println!("  Sheet {}: \"{}\"", sheet.sheet_id, sheet.name);
        println!(
            "    Rows: {}, columns: {}",
            sheet.worksheet.row_count(),
            sheet.worksheet.column_count()
        );
        if let Some(header) = sheet.worksheet.row(0) {
            println!("    First row: {}", header.texts().join(" | "));
        }
        if let Err(e) = sheet.worksheet.check_style_indices(workbook.cell_format_count()) {
            println!("    {}", e);
        }
    }

    if let Some(properties) = &package.properties {
        if let Some(title) = &properties.title {
            println!("Title: {}", title);
        }
    }

    if report.is_conformant() {
        println!("Schema: no findings");
    } else {
        println!("Schema: {} findings", report.len());
        for violation in report.iter() {
            println!("  {}", violation);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_style_choice_parsing() {
        assert_eq!(
            "programmatic".parse::<StyleChoice>().unwrap(),
            StyleChoice::Programmatic
        );
        assert_eq!(
            "predefined:corporate".parse::<StyleChoice>().unwrap(),
            StyleChoice::Predefined("corporate".to_string())
        );
        assert!("predefined:".parse::<StyleChoice>().is_err());
        assert!("fancy".parse::<StyleChoice>().is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "xlpack", "build", "-o", "out", "-r", "25", "-p", "3", "-s", "predefined:plain",
        ])
        .unwrap();
        match cli.command {
            Commands::Build {
                output_dir,
                records,
                packages,
                style,
                ..
            } => {
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!(records, 25);
                assert_eq!(packages, 3);
                assert_eq!(style, StyleChoice::Predefined("plain".to_string()));
            }
            Commands::Inspect { .. } => panic!("expected build"),
        }
    }
}
