//! Triple ingest from JSON files.
//!
//! Accepted format: a JSON array whose items are either `["s", "p", "o"]`
//! arrays or `{"s": "...", "p": "...", "o": "..."}` objects.

use std::path::Path;

use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

use super::Triple;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTriple {
    Tuple(String, String, String),
    Object { s: String, p: String, o: String },
}

impl From<RawTriple> for Triple {
    fn from(raw: RawTriple) -> Self {
        match raw {
            RawTriple::Tuple(s, p, o) | RawTriple::Object { s, p, o } => Triple::new(s, p, o),
        }
    }
}

/// Parse triples from a JSON string.
pub fn parse_triples(content: &str, origin: &str) -> StoreResult<Vec<Triple>> {
    let raw: Vec<RawTriple> =
        serde_json::from_str(content).map_err(|e| StoreError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
    Ok(raw.into_iter().map(Triple::from).collect())
}

/// Read triples from a JSON file.
pub fn read_triples(path: &Path) -> StoreResult<Vec<Triple>> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_triples(&content, &path.display().to_string())
}
