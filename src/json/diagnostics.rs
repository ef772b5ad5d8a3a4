//! JSON error diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// JSON syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid dataset {filename}: {message}")]
#[diagnostic(code(cala::json::syntax))]
pub struct JsonSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,

    /// The underlying error message
    message: String,
}

impl JsonSyntaxError {
    /// Create a diagnostic from a serde_json error
    pub fn from_serde_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }
}

/// Errors raised while reading a dataset file
#[derive(Debug, Error, Diagnostic)]
pub enum JsonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] JsonSyntaxError),

    #[error("cannot read dataset {}: {source}", .path.display())]
    #[diagnostic(
        code(cala::json::io),
        help("Check the dataset paths in .cala/config.yaml or the CALA_* environment variables")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    let mut current_line = 1;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            let line_start = i;
            let mut col = 1;
            for (j, c) in source[line_start..].char_indices() {
                if col == column {
                    return line_start + j;
                }
                if c == '\n' {
                    break;
                }
                col += 1;
            }
            return line_start + column.saturating_sub(1);
        }
        if ch == '\n' {
            current_line += 1;
        }
        offset = i;
    }

    offset
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("Remove the comma after the last item of the array or object.".to_string());
    }

    if msg_lower.contains("missing field") {
        return Some(
            "Every record needs its key fields: CertNo/Datasheet, Group/Measurements, \
             Nominal/Units/MeasUncert, Equipment/Range/ID/CMC."
                .to_string(),
        );
    }

    if msg_lower.contains("key must be a string") {
        return Some("Object keys must be double-quoted: \"CertNo\": ...".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The file ends early - check for an unclosed [ or {.".to_string());
    }

    if msg_lower.contains("invalid type") {
        return Some(
            "Key fields (CertNo, Group, Units, Equipment, ID, CMC) must be text, \
             Datasheet and Measurements must be arrays."
                .to_string(),
        );
    }

    None
}
