//! Agent struct: the main API for the tool-calling loop.
//!
//! The `Agent` owns a [`ToolRegistry`], a [`MemoryLog`] and a
//! [`DecisionPolicy`], and drives decide → act → observe until a tool
//! returns a final result, the chosen tool is missing, or the step bound is
//! reached.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::message::{AgentMessage, MessageSink, StdoutSink};

use super::error::{AgentError, AgentResult};
use super::memory::{MemoryLog, StepKind};
use super::policy::{DecisionPolicy, FirstRegisteredPolicy};
use super::tool::{ToolContext, ToolOutput, ToolRegistry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Step bound used when none is configured.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// Tool name chosen when the registry is empty.
pub const DEFAULT_FALLBACK_TOOL: &str = "kg_query";

/// Configuration for the agent, persisted as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum loop iterations before stopping (default: 10).
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Tool name the default policy picks on an empty registry (default: "kg_query").
    #[serde(default = "default_fallback_tool")]
    pub fallback_tool: String,
    /// Reject tool results that are not an object with a boolean `final`
    /// instead of treating them as non-final (default: false).
    #[serde(default)]
    pub strict_envelopes: bool,
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}
fn default_fallback_tool() -> String {
    DEFAULT_FALLBACK_TOOL.into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            fallback_tool: default_fallback_tool(),
            strict_envelopes: false,
        }
    }
}

impl AgentConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> AgentResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AgentError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| AgentError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> AgentResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| AgentError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AgentError::ConfigWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| AgentError::ConfigWrite {
            path: path.display().to_string(),
            source: e,
        })
    }
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Lifecycle of the agent loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// No run has started yet.
    Idle,
    /// A run is in progress.
    Running,
    /// A tool returned `final = true`.
    TerminatedFinal,
    /// The step bound was reached without a final result.
    TerminatedStepBound,
    /// The policy chose a tool that is not registered.
    TerminatedToolMissing,
    /// A tool failed and the error was returned to the caller.
    Failed,
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// A tool returned a final result at this step.
    Final { step: usize },
    /// The step bound was exhausted.
    StepBound { max_steps: usize },
    /// The chosen tool was not registered.
    ToolMissing { name: String },
}

impl From<&Termination> for AgentState {
    fn from(t: &Termination) -> Self {
        match t {
            Termination::Final { .. } => Self::TerminatedFinal,
            Termination::StepBound { .. } => Self::TerminatedStepBound,
            Termination::ToolMissing { .. } => Self::TerminatedToolMissing,
        }
    }
}

/// Outcome of one [`Agent::run_detailed`] call.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Why the loop stopped.
    pub termination: Termination,
    /// Tool calls completed and recorded during this run.
    pub steps: usize,
    /// The final envelope, if a tool produced one.
    pub result: Option<ToolOutput>,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// The agent: a tool registry, a reasoning memory, and a decision policy.
pub struct Agent {
    pub(crate) config: AgentConfig,
    pub(crate) tool_registry: ToolRegistry,
    pub(crate) memory: MemoryLog,
    pub(crate) policy: Box<dyn DecisionPolicy>,
    /// Structured message output sink.
    pub(crate) sink: Arc<dyn MessageSink>,
    pub(crate) state: AgentState,
}

impl Agent {
    /// Create an agent over `tools` with the default first-registered policy.
    pub fn new(tools: ToolRegistry, config: AgentConfig) -> Self {
        let policy = FirstRegisteredPolicy::new(config.fallback_tool.clone());
        Self {
            config,
            tool_registry: tools,
            memory: MemoryLog::new(),
            policy: Box::new(policy),
            sink: Arc::new(StdoutSink),
            state: AgentState::Idle,
        }
    }

    /// Replace the decision policy.
    pub fn with_policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the message sink.
    pub fn with_sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set the message sink for structured output.
    pub fn set_sink(&mut self, sink: Arc<dyn MessageSink>) {
        self.sink = sink;
    }

    /// Answer `query`, returning the final envelope or `None` when the loop
    /// stopped without one.
    pub fn run(&mut self, query: &str) -> AgentResult<Option<ToolOutput>> {
        self.run_detailed(query).map(|report| report.result)
    }

    /// Answer `query` and report how the loop terminated.
    ///
    /// A missing tool ends the run normally. Any other tool error is returned.
    pub fn run_detailed(&mut self, query: &str) -> AgentResult<RunReport> {
        tracing::info!(query, "agent started");
        self.state = AgentState::Running;
        self.memory.record(StepKind::Query, query);
        self.sink.emit(&AgentMessage::query(query));

        let max_steps = self.config.max_steps;
        let mut step = 0;
        let mut result = None;

        let termination = loop {
            if step >= max_steps {
                break Termination::StepBound { max_steps };
            }
            tracing::info!(step, "agent step");

            // ── Decide ──────────────────────────────────────────────────
            let available = self.tool_registry.names();
            let tool_name = self.policy.decide(query, self.memory.steps(), &available);
            let instruction = self.policy.instruction(query, step);

            // ── Act ─────────────────────────────────────────────────────
            let ctx = ToolContext::new(query, step, self.memory.steps());
            let out = match self.tool_registry.invoke(&tool_name, &instruction, &ctx) {
                Ok(out) => out,
                Err(AgentError::ToolNotFound { name }) => {
                    tracing::warn!(tool = %name, "tool not found, stopping");
                    self.sink.emit(&AgentMessage::warning(format!(
                        "tool \"{name}\" not found, stopping"
                    )));
                    break Termination::ToolMissing { name };
                }
                Err(e) => {
                    self.state = AgentState::Failed;
                    return Err(e);
                }
            };
            if self.config.strict_envelopes {
                if let Err(e) = out.validate(&tool_name) {
                    self.state = AgentState::Failed;
                    return Err(e);
                }
            }

            // ── Observe ─────────────────────────────────────────────────
            self.memory.record(
                StepKind::ToolCall,
                json!({ "tool": tool_name, "out": out.as_value() }),
            );
            let is_final = out.is_final();
            self.sink
                .emit(&AgentMessage::tool_call(&tool_name, step, is_final));

            if is_final {
                tracing::info!(step, "agent obtained final result");
                self.sink.emit(&AgentMessage::answer(out.as_value().clone()));
                result = Some(out);
                break Termination::Final { step };
            }
            step += 1;
        };

        let steps = match &termination {
            Termination::Final { step } => step + 1,
            _ => step,
        };
        tracing::info!(steps, ?termination, "agent finished");
        self.state = AgentState::from(&termination);

        Ok(RunReport {
            termination,
            steps,
            result,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// The reasoning memory accumulated so far.
    pub fn memory(&self) -> &MemoryLog {
        &self.memory
    }

    /// Forget all recorded steps so the next run starts from an empty log.
    pub fn reset_memory(&mut self) {
        self.memory.clear();
        self.state = AgentState::Idle;
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Mutable access to the tool registry, e.g. to register more tools.
    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tool_registry
    }

    /// The agent configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Get a reference to the current message sink.
    pub fn sink(&self) -> &dyn MessageSink {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .field("tools", &self.tool_registry)
            .field("memory", &self.memory.len())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::memory::MemoryStep;
    use crate::agent::tool::{Tool, ToolSignature};
    use crate::agent::tools::FinalAnswerTool;
    use crate::message::VecSink;

    fn quiet(agent: Agent) -> (Agent, Arc<VecSink>) {
        let sink = Arc::new(VecSink::new());
        (agent.with_sink(sink.clone()), sink)
    }

    struct Raw(serde_json::Value);
    impl Tool for Raw {
        fn signature(&self) -> ToolSignature {
            ToolSignature {
                name: "raw".into(),
                description: "Returns a fixed value".into(),
            }
        }
        fn execute(&self, _i: &str, _c: &ToolContext<'_>) -> AgentResult<ToolOutput> {
            Ok(ToolOutput::raw(self.0.clone()))
        }
    }

    struct Broken;
    impl Tool for Broken {
        fn signature(&self) -> ToolSignature {
            ToolSignature {
                name: "broken".into(),
                description: "Always fails".into(),
            }
        }
        fn execute(&self, _i: &str, _c: &ToolContext<'_>) -> AgentResult<ToolOutput> {
            Err(AgentError::ToolExecution {
                tool_name: "broken".into(),
                message: "boom".into(),
            })
        }
    }

    #[test]
    fn starts_idle() {
        let agent = Agent::new(ToolRegistry::new(), AgentConfig::default());
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(agent.config().max_steps, 10);
    }

    #[test]
    fn final_tool_ends_first_step() {
        let mut tools = ToolRegistry::new();
        tools.register("final_answer", Box::new(FinalAnswerTool::new()));
        let (mut agent, sink) = quiet(Agent::new(tools, AgentConfig::default()));

        let report = agent.run_detailed("why?").unwrap();
        assert_eq!(report.termination, Termination::Final { step: 0 });
        assert_eq!(report.steps, 1);
        assert!(report.result.unwrap().is_final());
        assert_eq!(agent.state(), AgentState::TerminatedFinal);
        assert_eq!(agent.memory().len(), 2);
        assert!(sink.messages().iter().any(|m| matches!(m, AgentMessage::Answer { .. })));
    }

    #[test]
    fn malformed_results_are_non_final_by_default() {
        let mut tools = ToolRegistry::new();
        tools.register("raw", Box::new(Raw(serde_json::json!("plain text"))));
        let config = AgentConfig {
            max_steps: 2,
            ..Default::default()
        };
        let (mut agent, _) = quiet(Agent::new(tools, config));

        assert!(agent.run("q").unwrap().is_none());
        assert_eq!(agent.state(), AgentState::TerminatedStepBound);
        assert_eq!(agent.memory().len(), 3);
    }

    #[test]
    fn strict_envelopes_surface_violation() {
        let mut tools = ToolRegistry::new();
        tools.register("raw", Box::new(Raw(serde_json::json!({"answer": 1}))));
        let config = AgentConfig {
            strict_envelopes: true,
            ..Default::default()
        };
        let (mut agent, _) = quiet(Agent::new(tools, config));

        let err = agent.run("q").unwrap_err();
        assert!(matches!(err, AgentError::ContractViolation { .. }));
        assert_eq!(agent.state(), AgentState::Failed);
        assert_eq!(agent.memory().len(), 1);
    }

    #[test]
    fn tool_errors_propagate() {
        let mut tools = ToolRegistry::new();
        tools.register("broken", Box::new(Broken));
        let (mut agent, _) = quiet(Agent::new(tools, AgentConfig::default()));

        let err = agent.run("q").unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution { .. }));
        assert_eq!(agent.state(), AgentState::Failed);
    }

    #[test]
    fn zero_step_bound_never_calls_tools() {
        let mut tools = ToolRegistry::new();
        tools.register("final_answer", Box::new(FinalAnswerTool::new()));
        let config = AgentConfig {
            max_steps: 0,
            ..Default::default()
        };
        let (mut agent, _) = quiet(Agent::new(tools, config));

        let report = agent.run_detailed("q").unwrap();
        assert_eq!(report.termination, Termination::StepBound { max_steps: 0 });
        assert_eq!(report.steps, 0);
        assert_eq!(agent.memory().len(), 1);
    }

    struct ByName(&'static str);
    impl DecisionPolicy for ByName {
        fn decide(&self, _q: &str, _m: &[MemoryStep], _a: &[&str]) -> String {
            self.0.into()
        }
        fn instruction(&self, query: &str, _step: usize) -> String {
            query.to_uppercase()
        }
    }

    #[test]
    fn custom_policy_replaces_decision() {
        let mut tools = ToolRegistry::new();
        tools.register("raw", Box::new(Raw(serde_json::json!({"final": false}))));
        tools.register("final_answer", Box::new(FinalAnswerTool::new()));
        let (agent, _) = quiet(Agent::new(tools, AgentConfig::default()));
        let mut agent = agent.with_policy(Box::new(ByName("final_answer")));

        let out = agent.run("q").unwrap().unwrap();
        assert_eq!(
            out.get("answer"),
            Some(&serde_json::json!("SYNTHESIZED_ANSWER based on 1 steps"))
        );
    }

    #[test]
    fn memory_accumulates_across_runs_until_reset() {
        let mut tools = ToolRegistry::new();
        tools.register("final_answer", Box::new(FinalAnswerTool::new()));
        let (mut agent, _) = quiet(Agent::new(tools, AgentConfig::default()));

        agent.run("first").unwrap();
        let second = agent.run("second").unwrap().unwrap();
        assert_eq!(
            second.get("answer"),
            Some(&serde_json::json!("SYNTHESIZED_ANSWER based on 3 steps"))
        );
        assert_eq!(agent.memory().len(), 4);

        agent.reset_memory();
        assert!(agent.memory().is_empty());
        assert_eq!(agent.state(), AgentState::Idle);
    }
}
