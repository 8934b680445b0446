//! Program execution hook for the triple store.
//!
//! A program is a structured, multi-hop query expressed as a string. No parser
//! exists yet: the default [`InertProgramExecutor`] accepts anything and
//! reports that execution is a placeholder. A real parser plugs in through
//! [`TripleStore::with_program_executor`](super::TripleStore::with_program_executor).

use serde_json::{Value, json};

use super::TripleStore;

/// Executes a program string against a triple store.
pub trait ProgramExecutor: Send + Sync {
    /// Run `program` over `store` and return a JSON result.
    fn execute(&self, store: &TripleStore, program: &str) -> Value;
}

/// Placeholder executor: accepts any program and returns an inert result.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertProgramExecutor;

impl ProgramExecutor for InertProgramExecutor {
    fn execute(&self, _store: &TripleStore, program: &str) -> Value {
        tracing::info!(program, "executing program on store (placeholder)");
        json!({
            "result": null,
            "note": "execute_program is a placeholder",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TriplePattern;

    #[test]
    fn inert_executor_returns_placeholder() {
        let store = TripleStore::new();
        let out = store.execute_program("find(Alice).knows");
        assert!(out["result"].is_null());
        assert_eq!(out["note"], "execute_program is a placeholder");
    }

    struct CountExecutor;
    impl ProgramExecutor for CountExecutor {
        fn execute(&self, store: &TripleStore, program: &str) -> Value {
            let hits = store.query(&TriplePattern::any().with_predicate(program.trim()));
            json!({ "result": hits.len() })
        }
    }

    #[test]
    fn executor_is_replaceable() {
        let store = TripleStore::new().with_program_executor(Box::new(CountExecutor));
        store.load([("a", "r", "b"), ("b", "r", "c"), ("c", "s", "d")]);
        assert_eq!(store.execute_program("r")["result"], 2);
    }
}
