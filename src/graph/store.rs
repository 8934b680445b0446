//! In-memory triple store with wildcard pattern queries.
//!
//! Triples are kept in insertion order behind an `RwLock`, so a store can be
//! shared through an `Arc` between the agent's tools while still accepting
//! bulk loads.

use std::sync::RwLock;

use serde_json::Value;

use super::program::{InertProgramExecutor, ProgramExecutor};
use super::{Triple, TriplePattern};

/// Append-only store of triples.
///
/// Duplicates are permitted and insertion order is preserved, which keeps
/// query results deterministic.
pub struct TripleStore {
    triples: RwLock<Vec<Triple>>,
    program: Box<dyn ProgramExecutor>,
}

impl TripleStore {
    /// Create a new empty store with the inert program executor.
    pub fn new() -> Self {
        Self {
            triples: RwLock::new(Vec::new()),
            program: Box::new(InertProgramExecutor),
        }
    }

    /// Replace the program executor used by [`TripleStore::execute_program`].
    pub fn with_program_executor(mut self, executor: Box<dyn ProgramExecutor>) -> Self {
        self.program = executor;
        self
    }

    /// Append all given triples in order. No validation, no deduplication.
    pub fn load<I, T>(&self, triples: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Triple>,
    {
        let incoming: Vec<Triple> = triples.into_iter().map(Into::into).collect();
        tracing::info!(count = incoming.len(), "loading triples into store");
        let mut store = self.triples.write().expect("triple store lock poisoned");
        store.extend(incoming);
    }

    /// Return every triple matching the pattern, in insertion order.
    pub fn query(&self, pattern: &TriplePattern) -> Vec<Triple> {
        let store = self.triples.read().expect("triple store lock poisoned");
        let results: Vec<Triple> = store
            .iter()
            .filter(|t| pattern.matches(t))
            .cloned()
            .collect();
        tracing::debug!(%pattern, hits = results.len(), "triple query");
        results
    }

    /// Execute a structured program against the store via the configured executor.
    pub fn execute_program(&self, program: &str) -> Value {
        self.program.execute(self, program)
    }

    /// All stored triples, in insertion order.
    pub fn all(&self) -> Vec<Triple> {
        self.triples
            .read()
            .expect("triple store lock poisoned")
            .clone()
    }

    /// Number of stored triples (duplicates included).
    pub fn len(&self) -> usize {
        self.triples.read().expect("triple store lock poisoned").len()
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TripleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("triples", &self.len())
            .finish()
    }
}
