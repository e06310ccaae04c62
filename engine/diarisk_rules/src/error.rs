use thiserror::Error;

/// A rule that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse rule '{source_text}' at column {column}: {message}")]
pub struct RuleParseError {
    pub source_text: String,
    /// 1-based character column of the failure.
    pub column: usize,
    pub message: String,
}

/// Problems found while compiling rules against the declared variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Parse(#[from] RuleParseError),

    #[error("rule '{rule}' refers to unknown input variable '{variable}'")]
    UnknownVariable { rule: String, variable: String },

    #[error("rule '{rule}' refers to unknown term '{term}' of variable '{variable}'")]
    UnknownTerm {
        rule: String,
        variable: String,
        term: String,
    },

    #[error("rule '{rule}' concludes on '{variable}' but the output variable is '{expected}'")]
    UnknownOutputVariable {
        rule: String,
        variable: String,
        expected: String,
    },

    #[error("rule '{rule}' concludes on unknown output term '{term}'")]
    UnknownOutputTerm { rule: String, term: String },

    #[error("rule '{rule}' contains an empty AND/OR group")]
    EmptyGroup { rule: String },

    #[error("rule base contains no rules")]
    Empty,
}
