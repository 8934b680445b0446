//! Tool system: trait-based tools with runtime registration.
//!
//! Tools are the agent's interface to the knowledge graph and to answer
//! synthesis. Each tool implements the [`Tool`] trait and is registered in a
//! [`ToolRegistry`] under a name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AgentError, AgentResult};
use super::memory::MemoryStep;

/// Description of a tool's interface.
#[derive(Debug, Clone)]
pub struct ToolSignature {
    /// Default registration name of the tool.
    pub name: String,
    /// What this tool does.
    pub description: String,
}

/// Read-only view handed to a tool for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// The question the agent is working on.
    pub query: &'a str,
    /// Zero-based loop step of this invocation.
    pub step: usize,
    memory: &'a [MemoryStep],
}

impl<'a> ToolContext<'a> {
    /// Create a context over a memory snapshot.
    pub fn new(query: &'a str, step: usize, memory: &'a [MemoryStep]) -> Self {
        Self {
            query,
            step,
            memory,
        }
    }

    /// Memory entries accumulated before this call.
    pub fn memory(&self) -> &'a [MemoryStep] {
        self.memory
    }
}

/// Result envelope returned by every tool.
///
/// Normally a JSON object carrying a boolean `final` flag plus tool-specific
/// fields. Anything else is tolerated and reads as non-final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOutput(Value);

impl ToolOutput {
    /// An envelope holding only the `final` flag.
    pub fn envelope(is_final: bool) -> Self {
        let mut map = Map::new();
        map.insert("final".into(), Value::Bool(is_final));
        Self(Value::Object(map))
    }

    /// A non-final envelope.
    pub fn partial() -> Self {
        Self::envelope(false)
    }

    /// A final envelope; the agent stops after receiving it.
    pub fn finished() -> Self {
        Self::envelope(true)
    }

    /// Wrap an arbitrary value as returned by a tool.
    pub fn raw(value: Value) -> Self {
        Self(value)
    }

    /// Add a field. No-op when the envelope is not an object.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Whether the envelope carries `final = true`.
    pub fn is_final(&self) -> bool {
        self.0
            .get("final")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Check the envelope shape: an object with a boolean `final` field.
    pub fn validate(&self, tool_name: &str) -> AgentResult<()> {
        let violation = |message: &str| AgentError::ContractViolation {
            tool_name: tool_name.into(),
            message: message.into(),
        };
        let map = self
            .0
            .as_object()
            .ok_or_else(|| violation("result is not a JSON object"))?;
        match map.get("final") {
            Some(Value::Bool(_)) => Ok(()),
            Some(_) => Err(violation("`final` is not a boolean")),
            None => Err(violation("missing `final` field")),
        }
    }

    /// Look up a field of the envelope.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume into the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl std::fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tool the agent can execute.
pub trait Tool: Send + Sync {
    /// Describe this tool's interface.
    fn signature(&self) -> ToolSignature;

    /// Execute the tool with the given instruction and read-only context.
    fn execute(&self, instruction: &str, ctx: &ToolContext<'_>) -> AgentResult<ToolOutput>;
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    /// Names in first-registration order.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool under `name`. If a tool with the same name exists, it is
    /// replaced and keeps its original position.
    pub fn register(&mut self, name: impl Into<String>, tool: Box<dyn Tool>) {
        let name = name.into();
        tracing::info!(tool = %name, "registering tool");
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::info!(tool = %name, "replaced previously registered tool");
        } else {
            self.order.push(name);
        }
    }

    /// Register a tool under its own signature name.
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        let name = tool.signature().name;
        self.register(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// Registered names, in first-registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// List all registered tool signatures, in registration order.
    pub fn list(&self) -> Vec<ToolSignature> {
        self.order
            .iter()
            .filter_map(|n| self.tools.get(n))
            .map(|t| t.signature())
            .collect()
    }

    /// Invoke a tool by name.
    pub fn invoke(
        &self,
        name: &str,
        instruction: &str,
        ctx: &ToolContext<'_>,
    ) -> AgentResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound { name: name.into() })?;
        tracing::debug!(tool = name, instruction, "calling tool");
        tool.execute(instruction, ctx)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}
