//! Decision policy: which tool to call next, and with what instruction.
//!
//! The agent loop never chooses tools itself; it asks a [`DecisionPolicy`].
//! The default [`FirstRegisteredPolicy`] stands in for a language-model driven
//! selector and can be swapped without touching the loop.

use super::memory::MemoryStep;

/// Chooses the next tool for the agent loop.
pub trait DecisionPolicy: Send + Sync {
    /// Pick a tool name given the query, the memory so far, and the
    /// registered tool names (in registration order).
    fn decide(&self, query: &str, memory: &[MemoryStep], available: &[&str]) -> String;

    /// Build the instruction handed to the chosen tool.
    fn instruction(&self, query: &str, step: usize) -> String {
        format!("Perform operation for: {query} (step {step})")
    }
}

/// Picks the first registered tool, or a fixed fallback name when none exist.
#[derive(Debug, Clone)]
pub struct FirstRegisteredPolicy {
    fallback: String,
}

impl FirstRegisteredPolicy {
    /// Create a policy that falls back to `fallback` on an empty registry.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl Default for FirstRegisteredPolicy {
    fn default() -> Self {
        Self::new(super::agent::DEFAULT_FALLBACK_TOOL)
    }
}

impl DecisionPolicy for FirstRegisteredPolicy {
    fn decide(&self, query: &str, _memory: &[MemoryStep], available: &[&str]) -> String {
        tracing::debug!(query, "deciding tool");
        available
            .first()
            .map(|name| name.to_string())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_available() {
        let policy = FirstRegisteredPolicy::default();
        assert_eq!(
            policy.decide("q", &[], &["final_answer", "kg_query"]),
            "final_answer"
        );
    }

    #[test]
    fn falls_back_on_empty_registry() {
        assert_eq!(FirstRegisteredPolicy::default().decide("q", &[], &[]), "kg_query");
        assert_eq!(FirstRegisteredPolicy::new("other").decide("q", &[], &[]), "other");
    }

    #[test]
    fn default_instruction_embeds_query_and_step() {
        let policy = FirstRegisteredPolicy::default();
        assert_eq!(
            policy.instruction("Who does Alice know?", 2),
            "Perform operation for: Who does Alice know? (step 2)"
        );
    }
}
