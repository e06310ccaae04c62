//! TOML knowledge-base files.
//!
//! A knowledge base is the full description of a fuzzy system: input
//! variables, the output variable, classification thresholds, the sampling
//! resolution and the rules in their textual form.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use diarisk_infer::{ConfigError, FuzzySystem, SystemDefinition, Thresholds, DEFAULT_RESOLUTION};
use diarisk_membership::{Domain, LinguisticVariable, Shape};
use diarisk_rules::{parse_rule, RuleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read, parse or build a knowledge base.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid knowledge base: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("term '{term}' of variable '{variable}' needs 3 or 4 parameters, found {count}")]
    Arity {
        variable: String,
        term: String,
        count: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl KnowledgeBaseError {
    /// True for problems with the file's content rather than access to it.
    pub fn is_config(&self) -> bool {
        !matches!(self, KnowledgeBaseError::Io { .. })
    }
}

impl From<RuleError> for KnowledgeBaseError {
    fn from(e: RuleError) -> Self {
        KnowledgeBaseError::Config(ConfigError::Rules(e))
    }
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

fn default_shoulders() -> bool {
    true
}

/// A whole fuzzy system in serializable form; `resolution` and
/// `thresholds` fall back to the engine defaults when omitted.
///
/// ```
/// use diarisk::parse_knowledge_base;
///
/// let kb = parse_knowledge_base(r#"
/// rules = ["IF glucose IS high THEN high_risk"]
///
/// [[inputs]]
/// name = "glucose"
/// domain = [50.0, 200.0]
/// terms = [{ name = "high", params = [100.0, 150.0, 200.0] }]
///
/// [output]
/// name = "risk"
/// domain = [0.0, 100.0]
/// terms = [{ name = "high_risk", params = [58.0, 80.0, 100.0] }]
/// "#).unwrap();
/// assert_eq!(kb.resolution, 0.1);
/// assert!(kb.build().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KnowledgeBase {
    #[serde(default = "default_resolution")]
    pub resolution: f64,

    pub rules: Vec<String>,

    #[serde(default)]
    pub thresholds: Thresholds,

    pub inputs: Vec<VariableSpec>,

    pub output: VariableSpec,
}

/// A linguistic variable: its name, `[min, max]` domain and terms.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VariableSpec {
    pub name: String,
    pub domain: [f64; 2],

    /// Turn the first and last triangular terms into domain-edge shoulders.
    #[serde(default = "default_shoulders")]
    pub shoulders: bool,

    pub terms: Vec<TermSpec>,
}

/// A term given by 3 triangle or 4 trapezoid corner parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TermSpec {
    pub name: String,
    pub params: Vec<f64>,
}

impl TermSpec {
    pub fn new(name: &str, params: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            params: params.to_vec(),
        }
    }

    fn shape(&self, variable: &str) -> Result<Shape, KnowledgeBaseError> {
        match self.params[..] {
            [a, b, c] => Ok(Shape::triangle(a, b, c)),
            [a, b, c, d] => Ok(Shape::trapezoid(a, b, c, d)),
            _ => Err(KnowledgeBaseError::Arity {
                variable: variable.to_string(),
                term: self.name.clone(),
                count: self.params.len(),
            }),
        }
    }
}

impl VariableSpec {
    pub fn new(name: &str, domain: [f64; 2], terms: Vec<TermSpec>) -> Self {
        Self {
            name: name.to_string(),
            domain,
            shoulders: true,
            terms,
        }
    }

    pub fn to_variable(&self) -> Result<LinguisticVariable, KnowledgeBaseError> {
        let [min, max] = self.domain;
        let mut variable = LinguisticVariable::new(self.name.as_str(), Domain::new(min, max));
        for term in &self.terms {
            variable.push_term(term.name.as_str(), term.shape(&self.name)?);
        }
        if self.shoulders {
            variable.apply_shoulders().map_err(ConfigError::from)?;
        }
        Ok(variable)
    }
}

impl KnowledgeBase {
    /// Reads and parses a knowledge-base file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let text = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = parse_knowledge_base(&text)?;
        log::debug!(
            "loaded knowledge base '{}': {} inputs, {} rules",
            path.display(),
            kb.inputs.len(),
            kb.rules.len()
        );
        Ok(kb)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolves the variables and rules into a [`SystemDefinition`].
    pub fn definition(&self) -> Result<SystemDefinition, KnowledgeBaseError> {
        let inputs = self
            .inputs
            .iter()
            .map(VariableSpec::to_variable)
            .collect::<Result<Vec<_>, _>>()?;
        let output = self.output.to_variable()?;
        let rules = self
            .rules
            .iter()
            .map(|text| parse_rule(text).map_err(RuleError::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SystemDefinition {
            inputs,
            output,
            rules,
            resolution: self.resolution,
            thresholds: self.thresholds,
        })
    }

    /// Builds and validates the fuzzy system this knowledge base describes.
    pub fn build(&self) -> Result<FuzzySystem, KnowledgeBaseError> {
        Ok(FuzzySystem::new(self.definition()?)?)
    }
}

pub fn parse_knowledge_base(text: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    Ok(toml::from_str::<KnowledgeBase>(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diarisk_infer::RiskLevel;
    use diarisk_membership::MembershipError;
    use pretty_assertions::assert_eq;

    const SMALL: &str = r#"
rules = [
    "IF glucose IS normal THEN low_risk",
    "IF glucose IS high THEN risk IS high_risk",
]

[[inputs]]
name = "glucose"
domain = [50.0, 200.0]
terms = [
    { name = "normal", params = [50.0, 90.0, 110.0] },
    { name = "high", params = [100.0, 150.0, 200.0] },
]

[output]
name = "risk"
domain = [0.0, 100.0]
terms = [
    { name = "low_risk", params = [0.0, 20.0, 40.0] },
    { name = "high_risk", params = [58.0, 80.0, 100.0] },
]
"#;

    #[test]
    fn parses_with_defaults() {
        let kb = parse_knowledge_base(SMALL).unwrap();
        assert_eq!(kb.resolution, 0.1);
        assert_eq!(kb.thresholds, Thresholds::default());
        assert!(kb.inputs[0].shoulders);
        assert_eq!(kb.rules.len(), 2);

        let system = kb.build().unwrap();
        assert_eq!(
            system.inputs()[0].terms()[0].shape,
            Shape::left_shoulder(50.0, 90.0, 110.0)
        );
        let result = system.assess(&[("glucose", 60.0)]).unwrap();
        assert_eq!(result.classification, RiskLevel::Low);
    }

    #[test]
    fn toml_round_trip_preserves_the_knowledge_base() {
        let kb = parse_knowledge_base(SMALL).unwrap();
        let text = kb.to_toml().unwrap();
        assert_eq!(parse_knowledge_base(&text).unwrap(), kb);
    }

    #[test]
    fn four_parameters_make_a_trapezoid() {
        let kb = parse_knowledge_base(&SMALL.replace("[50.0, 90.0, 110.0]", "[50.0, 60.0, 90.0, 110.0]"))
            .unwrap();
        let system = kb.build().unwrap();
        assert_eq!(
            system.inputs()[0].terms()[0].shape,
            Shape::trapezoid(50.0, 60.0, 90.0, 110.0)
        );
    }

    #[test]
    fn wrong_parameter_count_is_reported() {
        let kb = parse_knowledge_base(&SMALL.replace("[100.0, 150.0, 200.0]", "[100.0, 150.0]"))
            .unwrap();
        let err = kb.build().unwrap_err();
        assert!(matches!(
            err,
            KnowledgeBaseError::Arity { ref term, count: 2, .. } if term == "high"
        ));
        assert!(err.is_config());
    }

    #[test]
    fn bad_rules_and_shapes_are_configuration_errors() {
        let kb = parse_knowledge_base(&SMALL.replace("glucose IS high", "glucose IS extreme"))
            .unwrap();
        assert!(matches!(
            kb.build().unwrap_err(),
            KnowledgeBaseError::Config(ConfigError::Rules(RuleError::UnknownTerm { .. }))
        ));

        let kb = parse_knowledge_base(&SMALL.replace("IF glucose IS normal", "IF glucose normal"))
            .unwrap();
        assert!(matches!(
            kb.build().unwrap_err(),
            KnowledgeBaseError::Config(ConfigError::Rules(RuleError::Parse(_)))
        ));

        let kb = parse_knowledge_base(&SMALL.replace("[100.0, 150.0, 200.0]", "[160.0, 150.0, 200.0]"))
            .unwrap();
        assert!(matches!(
            kb.build().unwrap_err(),
            KnowledgeBaseError::Config(ConfigError::Membership(MembershipError::NonMonotonic { .. }))
        ));
    }

    #[test]
    fn reversed_outer_terms_are_rejected_before_becoming_shoulders() {
        for (declared, reversed, term) in [
            ("[50.0, 90.0, 110.0]", "[60.0, 55.0, 90.0]", "normal"),
            ("[100.0, 150.0, 200.0]", "[100.0, 150.0, 120.0]", "high"),
        ] {
            let kb = parse_knowledge_base(&SMALL.replace(declared, reversed)).unwrap();
            match kb.build().unwrap_err() {
                KnowledgeBaseError::Config(ConfigError::Membership(MembershipError::NonMonotonic {
                    term: name,
                    ..
                })) => assert_eq!(name, term),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn resolution_finer_than_the_sample_cap_is_rejected() {
        let kb = parse_knowledge_base(&format!("resolution = 1e-9\n{SMALL}")).unwrap();
        assert!(matches!(
            kb.build().unwrap_err(),
            KnowledgeBaseError::Config(ConfigError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn syntax_errors_and_missing_files() {
        let err = parse_knowledge_base("rules = [").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Toml(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(!err.is_config());
        assert!(err.to_string().contains("absent.toml"));
    }
}
