//! Knowledge graph: an ordered, append-only store of triples with wildcard queries.
//!
//! The graph stores triples (subject, predicate, object) whose terms are opaque strings.
//!
//! - **Store** ([`TripleStore`]): insertion-ordered triples behind an `RwLock`
//! - **Program hook** ([`ProgramExecutor`]): replaceable executor for structured programs
//! - **Ingest** ([`read_triples`]): loads triples from a JSON file

pub mod ingest;
pub mod program;
pub mod store;

use serde::{Deserialize, Serialize};

pub use ingest::read_triples;
pub use program::{InertProgramExecutor, ProgramExecutor};
pub use store::TripleStore;

/// A triple (subject, predicate, object) in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The subject of the triple.
    pub subject: String,
    /// The predicate (relation) of the triple.
    pub predicate: String,
    /// The object of the triple.
    pub object: String,
}

impl Triple {
    /// Create a new triple.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl<S, P, O> From<(S, P, O)> for Triple
where
    S: Into<String>,
    P: Into<String>,
    O: Into<String>,
{
    fn from((s, p, o): (S, P, O)) -> Self {
        Self::new(s, p, o)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

/// A triple pattern where any field may be a wildcard (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
}

impl TriplePattern {
    /// The all-wildcard pattern, matching every triple.
    pub fn any() -> Self {
        Self::default()
    }

    /// Bind the subject field.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Bind the predicate field.
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Bind the object field.
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Whether every field is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.subject.is_none() && self.predicate.is_none() && self.object.is_none()
    }

    /// Whether the triple matches every bound field of this pattern.
    pub fn matches(&self, triple: &Triple) -> bool {
        fn field(bound: &Option<String>, value: &str) -> bool {
            bound.as_deref().is_none_or(|b| b == value)
        }
        field(&self.subject, &triple.subject)
            && field(&self.predicate, &triple.predicate)
            && field(&self.object, &triple.object)
    }
}

impl std::fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".into());
        write!(
            f,
            "({}, {}, {})",
            show(&self.subject),
            show(&self.predicate),
            show(&self.object)
        )
    }
}
