//! Final answer tool: synthesize an answer from memory and end the run.

use crate::agent::error::AgentResult;
use crate::agent::memory::MemoryStep;
use crate::agent::tool::{Tool, ToolContext, ToolOutput, ToolSignature};

/// Produces answer text from the accumulated memory.
///
/// This is where a language model would plug in.
pub trait AnswerSynthesizer: Send + Sync {
    fn synthesize(&self, query: &str, memory: &[MemoryStep]) -> String;
}

/// Answers with a fixed template naming how many steps were seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

impl AnswerSynthesizer for TemplateSynthesizer {
    fn synthesize(&self, _query: &str, memory: &[MemoryStep]) -> String {
        format!("SYNTHESIZED_ANSWER based on {} steps", memory.len())
    }
}

/// Collect memory and synthesize the final answer. Always finalizes a run.
pub struct FinalAnswerTool {
    synthesizer: Box<dyn AnswerSynthesizer>,
}

impl FinalAnswerTool {
    /// Create a final answer tool using the template synthesizer.
    pub fn new() -> Self {
        Self {
            synthesizer: Box::new(TemplateSynthesizer),
        }
    }

    /// Use a different synthesizer.
    pub fn with_synthesizer(synthesizer: Box<dyn AnswerSynthesizer>) -> Self {
        Self { synthesizer }
    }
}

impl Default for FinalAnswerTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FinalAnswerTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "final_answer".into(),
            description: "Synthesize a final answer from the reasoning memory.".into(),
        }
    }

    fn execute(&self, _instruction: &str, ctx: &ToolContext<'_>) -> AgentResult<ToolOutput> {
        tracing::debug!(steps = ctx.memory().len(), "final_answer generating answer from memory");
        let answer = self.synthesizer.synthesize(ctx.query, ctx.memory());
        Ok(ToolOutput::finished().with_field("answer", answer))
    }
}
