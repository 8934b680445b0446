//! Agent layer: tool-calling reasoning over the knowledge graph.
//!
//! The agent adds, on top of the triple store:
//! - **Memory** (append-only log of query, tool call and observation steps)
//! - **Tools** (trait impls with runtime registration by name)
//! - **Decision policy** (replaceable choice of the next tool and instruction)
//! - **Agent loop** (decide → act → observe, bounded by `max_steps`)

pub mod agent;
pub mod error;
pub mod memory;
pub mod policy;
pub mod tool;
pub mod tools;

pub use agent::{Agent, AgentConfig, AgentState, RunReport, Termination};
pub use error::{AgentError, AgentResult};
pub use memory::{MemoryLog, MemoryStep, StepKind};
pub use policy::{DecisionPolicy, FirstRegisteredPolicy};
pub use tool::{Tool, ToolContext, ToolOutput, ToolRegistry, ToolSignature};
