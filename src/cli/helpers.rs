//! Shared helper functions for CLI commands
//!
//! List commands build a header plus rows of strings and hand them to
//! [`print_table`]; JSON and YAML go through serde via [`print_serialized`].

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::Write;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as JSON or YAML
///
/// Returns `false` without printing for tabular formats.
pub fn print_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Print rows as TSV, CSV or a markdown table
///
/// `Auto` prints TSV with a bold header.
pub fn print_table(format: OutputFormat, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(headers).into_diagnostic()?;
            for row in rows {
                writer.write_record(row).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(headers.iter().copied());
            for row in rows {
                builder.push_record(row.iter().map(String::as_str));
            }
            println!("{}", builder.build().with(Style::markdown()).to_string());
        }
        _ => {
            let header: Vec<String> = headers
                .iter()
                .map(|h| style(h.to_uppercase()).bold().to_string())
                .collect();
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", header.join("\t")).into_diagnostic()?;
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| c.replace(['\t', '\n'], " ")).collect();
                writeln!(out, "{}", cells.join("\t")).into_diagnostic()?;
            }
        }
    }
    Ok(())
}

/// Print a "N thing(s) found" summary unless quiet or piping a data format
pub fn print_summary(format: OutputFormat, quiet: bool, count: usize, noun: &str) {
    if quiet || !matches!(format, OutputFormat::Auto | OutputFormat::Tsv) {
        return;
    }
    println!();
    println!("{} {}(s) found", style(count).cyan(), noun);
}
