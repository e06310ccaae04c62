//! Fuzzy membership library for diarisk.
//!
//! This crate defines membership function shapes, linguistic variables and
//! the fuzzification stage that maps crisp readings onto term degrees.

pub mod error;
pub mod fuzzify;
pub mod shape;
pub mod variable;

pub use error::MembershipError;
pub use fuzzify::{fuzzify, FuzzifiedVariable, FuzzyInputVector, TermDegree};
pub use shape::Shape;
pub use variable::{Domain, LinguisticVariable, Term};
