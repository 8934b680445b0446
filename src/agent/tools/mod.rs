//! Built-in tools for the agent: KG query and final answer.

pub mod final_answer;
pub mod kg_query;

pub use final_answer::{AnswerSynthesizer, FinalAnswerTool, TemplateSynthesizer};
pub use kg_query::{InstructionParser, KgQueryTool, WildcardParser};
