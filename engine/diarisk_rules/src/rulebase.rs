//! Compiled rule bases.
//!
//! Compilation resolves every `variable IS term` condition and every
//! consequent to positions in the declared variables. A compiled rule base
//! therefore cannot refer to anything that fuzzification does not produce.

use diarisk_membership::{FuzzyInputVector, LinguisticVariable};
use log::debug;

use crate::ast::{Antecedent, Rule};
use crate::error::RuleError;

#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Is { variable: usize, term: usize },
    And(Vec<Resolved>),
    Or(Vec<Resolved>),
}

impl Resolved {
    fn strength(&self, inputs: &FuzzyInputVector<'_>) -> f64 {
        match self {
            Resolved::Is { variable, term } => inputs.degree_at(*variable, *term),
            Resolved::And(items) => items
                .iter()
                .map(|item| item.strength(inputs))
                .fold(1.0, f64::min),
            Resolved::Or(items) => items
                .iter()
                .map(|item| item.strength(inputs))
                .fold(0.0, f64::max),
        }
    }
}

/// A rule resolved against its system's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    rule: Rule,
    antecedent: Resolved,
    consequent: usize,
}

impl CompiledRule {
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Position of the concluded term in the output variable.
    pub fn consequent_term(&self) -> usize {
        self.consequent
    }

    /// Degree to which the antecedent holds, in `[0, 1]`.
    pub fn firing_strength(&self, inputs: &FuzzyInputVector<'_>) -> f64 {
        self.antecedent.strength(inputs)
    }
}

/// Firing strength of one rule for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation<'a> {
    pub index: usize,
    pub rule: &'a Rule,
    pub consequent_term: usize,
    pub strength: f64,
}

/// Immutable, validated set of rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    rules: Vec<CompiledRule>,
}

impl RuleBase {
    /// Resolves `rules` against the input variables and the output variable.
    ///
    /// Input variables are addressed by their position in `inputs`, which
    /// must match the order fuzzification pushes them in.
    pub fn compile(
        rules: Vec<Rule>,
        inputs: &[LinguisticVariable],
        output: &LinguisticVariable,
    ) -> Result<Self, RuleError> {
        if rules.is_empty() {
            return Err(RuleError::Empty);
        }
        let compiled = rules
            .into_iter()
            .map(|rule| compile_rule(rule, inputs, output))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "compiled {} rules over {} input variables",
            compiled.len(),
            inputs.len()
        );
        Ok(Self { rules: compiled })
    }

    /// Parses and compiles rules written in the rule language.
    pub fn parse<S: AsRef<str>>(
        texts: &[S],
        inputs: &[LinguisticVariable],
        output: &LinguisticVariable,
    ) -> Result<Self, RuleError> {
        let rules = texts
            .iter()
            .map(|t| crate::parser::parse_rule(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::compile(rules, inputs, output)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// One firing strength per rule, in rule order.
    pub fn firing_strengths(&self, inputs: &FuzzyInputVector<'_>) -> Vec<f64> {
        self.rules
            .iter()
            .map(|r| r.firing_strength(inputs))
            .collect()
    }

    /// Every rule's activation, in rule order.
    pub fn activations<'a>(&'a self, inputs: &FuzzyInputVector<'_>) -> Vec<Activation<'a>> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, r)| Activation {
                index,
                rule: &r.rule,
                consequent_term: r.consequent,
                strength: r.firing_strength(inputs),
            })
            .collect()
    }
}

fn compile_rule(
    rule: Rule,
    inputs: &[LinguisticVariable],
    output: &LinguisticVariable,
) -> Result<CompiledRule, RuleError> {
    let text = rule.to_string();
    let antecedent = resolve(&rule.antecedent, inputs, &text)?;

    if let Some(variable) = &rule.consequent.variable {
        if variable != output.name() {
            return Err(RuleError::UnknownOutputVariable {
                rule: text,
                variable: variable.clone(),
                expected: output.name().to_string(),
            });
        }
    }
    let consequent =
        output
            .term_index(&rule.consequent.term)
            .ok_or_else(|| RuleError::UnknownOutputTerm {
                rule: text.clone(),
                term: rule.consequent.term.clone(),
            })?;

    Ok(CompiledRule {
        rule,
        antecedent,
        consequent,
    })
}

fn resolve(
    antecedent: &Antecedent,
    inputs: &[LinguisticVariable],
    text: &str,
) -> Result<Resolved, RuleError> {
    match antecedent {
        Antecedent::Is { variable, term } => {
            let v = inputs
                .iter()
                .position(|var| var.name() == variable)
                .ok_or_else(|| RuleError::UnknownVariable {
                    rule: text.to_string(),
                    variable: variable.clone(),
                })?;
            let t = inputs[v]
                .term_index(term)
                .ok_or_else(|| RuleError::UnknownTerm {
                    rule: text.to_string(),
                    variable: variable.clone(),
                    term: term.clone(),
                })?;
            Ok(Resolved::Is {
                variable: v,
                term: t,
            })
        }
        Antecedent::And(items) | Antecedent::Or(items) => {
            if items.is_empty() {
                return Err(RuleError::EmptyGroup {
                    rule: text.to_string(),
                });
            }
            let resolved = items
                .iter()
                .map(|item| resolve(item, inputs, text))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match antecedent {
                Antecedent::And(_) => Resolved::And(resolved),
                _ => Resolved::Or(resolved),
            })
        }
    }
}
