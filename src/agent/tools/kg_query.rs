//! KG query tool: match a triple pattern against the store.

use std::sync::Arc;

use serde_json::Value;

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{Tool, ToolContext, ToolOutput, ToolSignature};
use crate::graph::{TriplePattern, TripleStore};

/// Turns a free-text instruction into a triple pattern.
pub trait InstructionParser: Send + Sync {
    fn parse(&self, instruction: &str) -> TriplePattern;
}

/// Ignores the instruction and matches every triple.
///
/// Stand-in until instructions carry a structured pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardParser;

impl InstructionParser for WildcardParser {
    fn parse(&self, _instruction: &str) -> TriplePattern {
        TriplePattern::any()
    }
}

/// Query triples from the knowledge graph. Never finalizes a run.
pub struct KgQueryTool {
    store: Arc<TripleStore>,
    parser: Box<dyn InstructionParser>,
}

impl KgQueryTool {
    /// Create a query tool over `store` using the wildcard parser.
    pub fn new(store: Arc<TripleStore>) -> Self {
        Self {
            store,
            parser: Box::new(WildcardParser),
        }
    }

    /// Replace the instruction parser.
    pub fn with_parser(mut self, parser: Box<dyn InstructionParser>) -> Self {
        self.parser = parser;
        self
    }
}

impl Tool for KgQueryTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "kg_query".into(),
            description: "Query triples in the knowledge graph matching a pattern.".into(),
        }
    }

    fn execute(&self, instruction: &str, _ctx: &ToolContext<'_>) -> AgentResult<ToolOutput> {
        tracing::debug!(instruction, "kg_query received instruction");
        let pattern = self.parser.parse(instruction);
        let results = self.store.query(&pattern);
        let results = serde_json::to_value(&results).map_err(|e| AgentError::ToolExecution {
            tool_name: "kg_query".into(),
            message: format!("failed to encode results: {e}"),
        })?;
        Ok(ToolOutput::partial().with_field("results", results))
    }
}

/// Number of triples in a `kg_query` result envelope.
pub fn result_count(output: &ToolOutput) -> usize {
    output
        .get("results")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
