use diarisk_membership::MembershipError;
use diarisk_rules::RuleError;
use thiserror::Error;

/// Fatal problems in a system definition, reported once at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("system declares no input variables")]
    NoInputs,

    #[error("variable '{0}' is declared more than once")]
    DuplicateVariable(String),

    #[error(
        "resolution {resolution} must be positive, no wider than the output domain ({width}) and split it into at most {max_samples} samples"
    )]
    InvalidResolution {
        resolution: f64,
        width: f64,
        max_samples: usize,
    },

    #[error(
        "thresholds moderate={moderate} and high={high} must increase strictly inside the output domain [{min}, {max}]"
    )]
    InvalidThresholds {
        moderate: f64,
        high: f64,
        min: f64,
        max: f64,
    },
}

/// A crisp input the engine cannot evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing value for input variable '{0}'")]
    Missing(String),

    #[error("value {value} for input variable '{variable}' is not a finite number")]
    NonFinite { variable: String, value: f64 },
}

/// The aggregated output set is zero everywhere, so it has no centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no rule fired for the given inputs")]
pub struct NoRuleFired;
