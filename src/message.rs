//! Structured message protocol for agent output.
//!
//! `AgentMessage` replaces raw `println!()` calls inside the agent with
//! structured, typed messages that can be rendered by different sinks:
//! terminal (styled), JSON (streaming), or collected in memory (testing).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

// ── Message types ───────────────────────────────────────────────────────

/// A structured message emitted by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentMessage {
    /// A run started for this question.
    Query { text: String },
    /// A tool was invoked during a step.
    ToolCall {
        tool: String,
        step: usize,
        #[serde(rename = "final")]
        is_final: bool,
    },
    /// The run produced a final result envelope.
    Answer { result: Value },
    /// Non-fatal problem, e.g. the chosen tool is missing.
    Warning { message: String },
    /// System status or informational message.
    System { text: String },
}

// ── MessageSink trait ───────────────────────────────────────────────────

/// A destination for structured agent messages.
pub trait MessageSink: Send + Sync {
    /// Emit a single message.
    fn emit(&self, msg: &AgentMessage);

    /// Emit a batch of messages.
    fn emit_batch(&self, msgs: &[AgentMessage]) {
        for m in msgs {
            self.emit(m);
        }
    }
}

// ── StdoutSink ──────────────────────────────────────────────────────────

/// Renders messages as styled terminal output.
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn emit(&self, msg: &AgentMessage) {
        match msg {
            AgentMessage::Query { text } => println!("[query] {text}"),
            AgentMessage::ToolCall {
                tool,
                step,
                is_final,
            } => {
                let status = if *is_final { "final" } else { "continue" };
                println!("[step {step}] {tool}: {status}");
            }
            AgentMessage::Answer { result } => println!("[answer] {result}"),
            AgentMessage::Warning { message } => eprintln!("[warn] {message}"),
            AgentMessage::System { text } => println!("{text}"),
        }
    }
}

// ── JsonSink ────────────────────────────────────────────────────────────

/// Emits messages as newline-delimited JSON.
pub struct JsonSink;

impl MessageSink for JsonSink {
    fn emit(&self, msg: &AgentMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            println!("{json}");
        }
    }
}

// ── VecSink ─────────────────────────────────────────────────────────────

/// Collects messages into a `Vec<AgentMessage>` for testing.
pub struct VecSink {
    messages: Mutex<Vec<AgentMessage>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected messages.
    pub fn messages(&self) -> Vec<AgentMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Number of collected messages.
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for VecSink {
    fn emit(&self, msg: &AgentMessage) {
        self.messages.lock().unwrap().push(msg.clone());
    }
}

// ── Convenience constructors ────────────────────────────────────────────

impl AgentMessage {
    pub fn query(text: impl Into<String>) -> Self {
        Self::Query { text: text.into() }
    }

    pub fn tool_call(tool: impl Into<String>, step: usize, is_final: bool) -> Self {
        Self::ToolCall {
            tool: tool.into(),
            step,
            is_final,
        }
    }

    pub fn answer(result: Value) -> Self {
        Self::Answer { result }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::System { text: text.into() }
    }
}
