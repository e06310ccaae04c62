//! Rule syntax tree.
//!
//! Antecedents are trees of `variable IS term` conditions joined by AND (min)
//! and OR (max). Names are kept as written; resolving them against the
//! declared variables happens once, when a [`crate::RuleBase`] is compiled.

use std::fmt;
use std::str::FromStr;

use diarisk_membership::FuzzyInputVector;
use serde::{Deserialize, Serialize};

use crate::error::RuleParseError;

/// Condition part of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    /// `variable IS term`
    Is { variable: String, term: String },
    /// All branches hold; evaluates to the minimum.
    And(Vec<Antecedent>),
    /// Any branch holds; evaluates to the maximum.
    Or(Vec<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(items: impl IntoIterator<Item = Antecedent>) -> Self {
        Antecedent::And(items.into_iter().collect())
    }

    pub fn or(items: impl IntoIterator<Item = Antecedent>) -> Self {
        Antecedent::Or(items.into_iter().collect())
    }

    /// Firing strength evaluated by name.
    ///
    /// Returns `None` when a condition names a variable or term that is not in
    /// `inputs`. Compiled rule bases never take this path.
    pub fn firing_strength(&self, inputs: &FuzzyInputVector<'_>) -> Option<f64> {
        match self {
            Antecedent::Is { variable, term } => inputs.degree(variable, term),
            Antecedent::And(items) => items
                .iter()
                .try_fold(1.0_f64, |acc, item| Some(acc.min(item.firing_strength(inputs)?))),
            Antecedent::Or(items) => items
                .iter()
                .try_fold(0.0_f64, |acc, item| Some(acc.max(item.firing_strength(inputs)?))),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent_is_and: bool) -> fmt::Result {
        match self {
            Antecedent::Or(items) if parent_is_and && items.len() > 1 => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antecedent::Is { variable, term } => write!(f, "{variable} IS {term}"),
            Antecedent::And(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    item.fmt_operand(f, true)?;
                }
                Ok(())
            }
            Antecedent::Or(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    item.fmt_operand(f, false)?;
                }
                Ok(())
            }
        }
    }
}

/// Conclusion of a rule: a term of the output variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Consequent {
    /// Output variable as written; `None` when the rule only names the term.
    pub variable: Option<String>,
    pub term: String,
}

impl Consequent {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: Some(variable.into()),
            term: term.into(),
        }
    }

    pub fn term(term: impl Into<String>) -> Self {
        Self {
            variable: None,
            term: term.into(),
        }
    }
}

impl fmt::Display for Consequent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variable {
            Some(variable) => write!(f, "{variable} IS {}", self.term),
            None => f.write_str(&self.term),
        }
    }
}

/// A single IF-THEN rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: Antecedent,
    pub consequent: Consequent,
}

impl Rule {
    pub fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {}", self.antecedent, self.consequent)
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_rule(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diarisk_membership::{Domain, LinguisticVariable, Shape};
    use pretty_assertions::assert_eq;

    #[test]
    fn display_parenthesises_or_under_and() {
        let a = Antecedent::and([
            Antecedent::is("fbs", "prediabetic"),
            Antecedent::or([Antecedent::is("bmi", "obese"), Antecedent::is("age", "old")]),
        ]);
        assert_eq!(
            a.to_string(),
            "fbs IS prediabetic AND (bmi IS obese OR age IS old)"
        );

        let b = Antecedent::or([
            Antecedent::and([Antecedent::is("a", "x"), Antecedent::is("b", "y")]),
            Antecedent::is("c", "z"),
        ]);
        assert_eq!(b.to_string(), "a IS x AND b IS y OR c IS z");
    }

    #[test]
    fn firing_strength_by_name_uses_min_and_max() {
        let fbs = LinguisticVariable::new("fbs", Domain::new(50.0, 200.0))
            .with_term("prediabetic", Shape::triangle(98.0, 110.0, 122.0));
        let bmi = LinguisticVariable::new("bmi", Domain::new(10.0, 45.0))
            .with_term("overweight", Shape::triangle(23.0, 26.0, 30.0))
            .with_term("obese", Shape::right_shoulder(28.0, 35.0, 45.0));

        let mut inputs = FuzzyInputVector::new();
        inputs.push(fbs.fuzzify(104.0)); // prediabetic 0.5
        inputs.push(bmi.fuzzify(29.0)); // overweight 0.25, obese 1/7

        let and = Antecedent::and([
            Antecedent::is("fbs", "prediabetic"),
            Antecedent::is("bmi", "overweight"),
        ]);
        assert!((and.firing_strength(&inputs).unwrap() - 0.25).abs() < 1e-12);

        let or = Antecedent::or([
            Antecedent::is("fbs", "prediabetic"),
            Antecedent::is("bmi", "obese"),
        ]);
        assert!((or.firing_strength(&inputs).unwrap() - 0.5).abs() < 1e-12);

        let missing = Antecedent::and([
            Antecedent::is("fbs", "prediabetic"),
            Antecedent::is("age", "old"),
        ]);
        assert_eq!(missing.firing_strength(&inputs), None);
    }
}
