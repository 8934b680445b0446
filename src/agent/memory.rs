//! Reasoning memory: the ordered, append-only log of an agent's steps.
//!
//! Insertion order is the causal order of the reasoning process. Entries are
//! never mutated or removed individually; tools only ever see a borrowed slice.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a memory step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// The user question that started a run.
    Query,
    /// A tool invocation together with its raw result.
    ToolCall,
    /// Something observed outside a tool call.
    Observation,
    /// Caller-defined step type.
    #[serde(untagged)]
    Custom(String),
}

impl StepKind {
    /// Wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Query => "query",
            Self::ToolCall => "tool_call",
            Self::Observation => "observation",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for StepKind {
    fn from(s: &str) -> Self {
        match s {
            "query" => Self::Query,
            "tool_call" => Self::ToolCall,
            "observation" => Self::Observation,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStep {
    /// What kind of step this is.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Opaque payload: a string or a structured map.
    pub content: Value,
}

/// Append-only log of reasoning steps.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    steps: Vec<MemoryStep>,
}

impl MemoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Never fails.
    pub fn record(&mut self, kind: impl Into<StepKind>, content: impl Into<Value>) {
        let kind = kind.into();
        tracing::debug!(kind = %kind, "recording memory step");
        self.steps.push(MemoryStep {
            kind,
            content: content.into(),
        });
    }

    /// The last `n` steps in original order.
    ///
    /// `n = 0` yields nothing; `n` past the log length yields the whole log.
    pub fn tail(&self, n: usize) -> &[MemoryStep] {
        let start = self.steps.len().saturating_sub(n);
        &self.steps[start..]
    }

    /// Every step in order.
    pub fn steps(&self) -> &[MemoryStep] {
        &self.steps
    }

    /// Steps of the given kind, in order.
    pub fn by_kind(&self, kind: &StepKind) -> Vec<&MemoryStep> {
        self.steps.iter().filter(|s| &s.kind == kind).collect()
    }

    /// Drop every step, starting a fresh log.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
