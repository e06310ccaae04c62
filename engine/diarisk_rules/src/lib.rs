//! Fuzzy IF-THEN rules for diarisk.
//!
//! Rules are written in a small text language, parsed into an antecedent
//! tree and compiled against the system's variables before any evaluation.

pub mod ast;
pub mod error;
pub mod parser;
pub mod rulebase;

pub use ast::{Antecedent, Consequent, Rule};
pub use error::{RuleError, RuleParseError};
pub use parser::{parse_antecedent, parse_rule, MAX_NESTING};
pub use rulebase::{Activation, CompiledRule, RuleBase};

#[cfg(test)]
mod tests {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize the logger for tests
    pub fn init_test_logger() {
        INIT.call_once(|| {
            let _ = env_logger::builder()
                .is_test(true)
                .filter_level(log::LevelFilter::Trace)
                .try_init();
        });
    }

    #[test]
    fn parse_logs_at_trace_level() {
        init_test_logger();
        let rule = crate::parse_rule("IF fbs IS low THEN low_risk").unwrap();
        assert_eq!(rule.to_string(), "IF fbs IS low THEN low_risk");
    }
}
