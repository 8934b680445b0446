//! Rich diagnostic error types for kg-agent.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::agent::error::AgentError;

/// Top-level error type for kg-agent.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KgAgentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Agent(#[from] AgentError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from loading triples into the store.
///
/// Queries themselves never fail; only file-backed ingest can.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to read triples file: {path}")]
    #[diagnostic(
        code(kg::store::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse triples from {path}: {message}")]
    #[diagnostic(
        code(kg::store::parse),
        help(
            "Triples must be a JSON array whose items are [s, p, o] string arrays \
             or objects with string keys s, p and o."
        )
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
