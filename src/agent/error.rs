//! Agent-specific error types with rich miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Errors specific to the agent layer (tools, loop, configuration).
#[derive(Debug, Error, Diagnostic)]
pub enum AgentError {
    #[error("tool not found: \"{name}\"")]
    #[diagnostic(
        code(kg::agent::tool_not_found),
        help("Register the tool first or check available tools with `registry.names()`.")
    )]
    ToolNotFound { name: String },

    #[error("tool execution failed: {tool_name} — {message}")]
    #[diagnostic(
        code(kg::agent::tool_execution),
        help("The tool encountered an error. Check the inner cause for details.")
    )]
    ToolExecution { tool_name: String, message: String },

    #[error("tool \"{tool_name}\" returned a malformed result: {message}")]
    #[diagnostic(
        code(kg::agent::contract_violation),
        help(
            "Tools must return a JSON object with a boolean `final` field. \
             Disable `strict_envelopes` to treat malformed results as non-final."
        )
    )]
    ContractViolation { tool_name: String, message: String },

    #[error("failed to read agent config: {path}")]
    #[diagnostic(
        code(kg::agent::config_read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse agent config {path}: {message}")]
    #[diagnostic(
        code(kg::agent::config_parse),
        help("Check the TOML syntax in the agent config file.")
    )]
    ConfigParse { path: String, message: String },

    #[error("failed to write agent config: {path}")]
    #[diagnostic(
        code(kg::agent::config_write),
        help("Ensure you have write permissions to the config directory.")
    )]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for agent operations.
pub type AgentResult<T> = std::result::Result<T, AgentError>;
