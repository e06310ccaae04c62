//! diarisk: fuzzy-logic diabetes risk assessment.
//!
//! This crate ties the engine crates together: the built-in diabetes
//! knowledge base and the TOML format knowledge bases are stored in.

pub mod diabetes;
pub mod knowledge;

pub use diabetes::DiabetesInputs;
pub use diarisk_infer::{AssessmentResult, Explanation, FuzzySystem, RiskLevel};
pub use knowledge::{parse_knowledge_base, KnowledgeBase, KnowledgeBaseError};
