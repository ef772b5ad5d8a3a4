//! Dataset file reading
//!
//! Laboratory exports are not always UTF-8: files that fail UTF-8 decoding
//! are read as ISO-8859-1 instead.

pub mod diagnostics;

use serde::de::DeserializeOwned;
use std::path::Path;

pub use diagnostics::{JsonError, JsonSyntaxError};

/// Decode raw file bytes, falling back to ISO-8859-1 and dropping a BOM
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("dataset is not UTF-8, decoding as ISO-8859-1");
            err.into_bytes().iter().map(|&b| b as char).collect()
        }
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Parse JSON text, attaching source-located diagnostics on failure
pub fn parse_json_str<T: DeserializeOwned>(source: &str, filename: &str) -> Result<T, JsonError> {
    serde_json::from_str(source)
        .map_err(|e| JsonSyntaxError::from_serde_error(&e, source, filename).into())
}

/// Read and parse a JSON dataset file
pub fn parse_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, JsonError> {
    let bytes = std::fs::read(path).map_err(|source| JsonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = decode_text(bytes);
    parse_json_str(&source, &path.display().to_string())
}
