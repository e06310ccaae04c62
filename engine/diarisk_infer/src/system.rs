//! The assembled inference system.

use std::collections::HashSet;

use diarisk_membership::{FuzzyInputVector, LinguisticVariable};
use diarisk_rules::{Rule, RuleBase};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    aggregate, consequent_strengths, intervals, strengths_from_activations, AggregatedOutputSet,
    MAX_SAMPLES,
};
use crate::classify::{Classifier, RiskLevel, Thresholds};
use crate::defuzzify::centroid;
use crate::error::{ConfigError, InputError};
use crate::explain::{DominantTerm, Explanation, FiredRule, TermStrength};
use crate::input::CrispInputs;

/// Default sampling step of the output domain.
pub const DEFAULT_RESOLUTION: f64 = 0.1;

/// Everything needed to build a [`FuzzySystem`], before validation.
#[derive(Debug, Clone)]
pub struct SystemDefinition {
    pub inputs: Vec<LinguisticVariable>,
    pub output: LinguisticVariable,
    pub rules: Vec<Rule>,
    pub resolution: f64,
    pub thresholds: Thresholds,
}

impl SystemDefinition {
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> Self {
        Self {
            inputs,
            output,
            rules,
            resolution: DEFAULT_RESOLUTION,
            thresholds: Thresholds::default(),
        }
    }
}

/// Crisp score and its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub crisp_value: f64,
    pub classification: RiskLevel,
    /// Set when no rule fired and the score is the output-domain midpoint.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl AssessmentResult {
    /// Copy with the score rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self {
            crisp_value: (self.crisp_value * 100.0).round() / 100.0,
            ..*self
        }
    }
}

/// Validated, immutable fuzzy inference system.
///
/// Evaluation never mutates the system, so one instance can be shared by
/// reference between any number of threads.
#[derive(Debug, Clone)]
pub struct FuzzySystem {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: RuleBase,
    resolution: f64,
    classifier: Classifier,
}

impl FuzzySystem {
    pub fn new(definition: SystemDefinition) -> Result<Self, ConfigError> {
        let SystemDefinition {
            inputs,
            output,
            rules,
            resolution,
            thresholds,
        } = definition;

        if inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        let mut seen = HashSet::new();
        for variable in inputs.iter().chain(std::iter::once(&output)) {
            variable.validate()?;
            if !seen.insert(variable.name()) {
                return Err(ConfigError::DuplicateVariable(variable.name().to_string()));
            }
        }

        let width = output.domain().width();
        let bounded = resolution.is_finite()
            && resolution > 0.0
            && resolution <= width
            && intervals(output.domain(), resolution) <= MAX_SAMPLES;
        if !bounded {
            return Err(ConfigError::InvalidResolution {
                resolution,
                width,
                max_samples: MAX_SAMPLES,
            });
        }
        let classifier = Classifier::new(thresholds, output.domain())?;
        let rules = RuleBase::compile(rules, &inputs, &output)?;

        debug!(
            "fuzzy system ready: {} inputs, {} output terms, {} rules, resolution {}",
            inputs.len(),
            output.terms().len(),
            rules.len(),
            resolution
        );
        Ok(Self {
            inputs,
            output,
            rules,
            resolution,
            classifier,
        })
    }

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Fuzzifies every input variable, in declaration order.
    pub fn fuzzify<I: CrispInputs + ?Sized>(
        &self,
        inputs: &I,
    ) -> Result<FuzzyInputVector<'_>, InputError> {
        let mut vector = FuzzyInputVector::with_capacity(self.inputs.len());
        for variable in &self.inputs {
            let name = variable.name();
            let x = inputs
                .value(name)
                .ok_or_else(|| InputError::Missing(name.to_string()))?;
            if !x.is_finite() {
                return Err(InputError::NonFinite {
                    variable: name.to_string(),
                    value: x,
                });
            }
            vector.push(variable.fuzzify(x));
        }
        Ok(vector)
    }

    /// Fires the rules and aggregates their clipped consequents.
    pub fn infer(&self, fuzzy: &FuzzyInputVector<'_>) -> AggregatedOutputSet {
        let strengths = consequent_strengths(&self.rules, &self.output, fuzzy);
        trace!("output term strengths: {strengths:?}");
        aggregate(&self.output, &strengths, self.resolution)
    }

    /// Defuzzifies and classifies an aggregated set, falling back to the
    /// output-domain midpoint when nothing fired.
    pub fn conclude(&self, set: &AggregatedOutputSet) -> AssessmentResult {
        let (crisp_value, fallback) = match centroid(set) {
            Ok(x) => (x, false),
            Err(e) => {
                let midpoint = self.output.domain().midpoint();
                warn!("{e}; using the midpoint {midpoint} of '{}'", self.output.name());
                (midpoint, true)
            }
        };
        let classification = self.classifier.classify(crisp_value);
        debug!("assessed {crisp_value:.4} as {classification}");
        AssessmentResult {
            crisp_value,
            classification,
            fallback,
        }
    }

    /// Runs the whole pipeline for one set of crisp readings.
    pub fn assess<I: CrispInputs + ?Sized>(
        &self,
        inputs: &I,
    ) -> Result<AssessmentResult, InputError> {
        let fuzzy = self.fuzzify(inputs)?;
        let set = self.infer(&fuzzy);
        Ok(self.conclude(&set))
    }

    /// Like [`FuzzySystem::assess`], keeping the intermediate stages.
    pub fn explain<I: CrispInputs + ?Sized>(
        &self,
        inputs: &I,
    ) -> Result<Explanation<'_>, InputError> {
        let fuzzy = self.fuzzify(inputs)?;
        let activations = self.rules.activations(&fuzzy);
        let strengths = strengths_from_activations(&activations, &self.output);
        let set = aggregate(&self.output, &strengths, self.resolution);
        let result = self.conclude(&set);

        let fired = activations
            .iter()
            .filter(|a| a.strength > 0.0)
            .map(|a| FiredRule {
                index: a.index,
                rule: a.rule.to_string(),
                consequent: self.output.terms()[a.consequent_term].name.clone(),
                strength: a.strength,
            })
            .collect();
        let term_strengths = self
            .output
            .terms()
            .iter()
            .zip(strengths)
            .map(|(term, strength)| TermStrength {
                term: term.name.as_str(),
                strength,
            })
            .collect();

        let dominant = fuzzy
            .iter()
            .filter_map(|v| {
                v.dominant()
                    .filter(|d| d.degree > 0.0)
                    .map(|d| DominantTerm {
                        variable: v.variable,
                        term: d.term,
                        degree: d.degree,
                    })
            })
            .collect();

        Ok(Explanation {
            result,
            inputs: fuzzy,
            dominant,
            fired,
            term_strengths,
        })
    }
}
