// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kg-agent
//!
//! A tool-calling agent that answers questions over an in-memory knowledge
//! graph of (subject, predicate, object) triples.
//!
//! ## Architecture
//!
//! - **Knowledge graph** (`graph`): insertion-ordered triple store with wildcard queries
//! - **Agent** (`agent`): tool registry, reasoning memory and the bounded decision loop
//! - **Messages** (`message`): structured output through injectable sinks
//!
//! ## Library usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kg_agent::agent::tools::{FinalAnswerTool, KgQueryTool};
//! use kg_agent::agent::{Agent, AgentConfig, ToolRegistry};
//! use kg_agent::graph::TripleStore;
//!
//! let store = Arc::new(TripleStore::new());
//! store.load([("Alice", "knows", "Bob")]);
//!
//! let mut tools = ToolRegistry::new();
//! tools.register("final_answer", Box::new(FinalAnswerTool::new()));
//! tools.register("kg_query", Box::new(KgQueryTool::new(Arc::clone(&store))));
//!
//! let mut agent = Agent::new(tools, AgentConfig::default());
//! let answer = agent.run("Who does Alice know?").unwrap();
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod message;
