use thiserror::Error;

/// Problems found while validating variables and their terms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MembershipError {
    #[error("term '{term}' has parameters {params:?} that are not ordered a <= b <= c <= d")]
    NonMonotonic { term: String, params: Vec<f64> },

    #[error("term '{term}' has non-finite parameters {params:?}")]
    NonFiniteParameter { term: String, params: Vec<f64> },

    #[error("variable '{variable}' has an empty or invalid domain [{min}, {max}]")]
    InvalidDomain { variable: String, min: f64, max: f64 },

    #[error("variable '{variable}' declares no terms")]
    NoTerms { variable: String },

    #[error("variable '{variable}' declares term '{term}' more than once")]
    DuplicateTerm { variable: String, term: String },

    #[error("shoulder term '{term}' of variable '{variable}' does not fit inside its domain")]
    ShoulderOutsideDomain { variable: String, term: String },
}
