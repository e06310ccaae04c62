//! Mamdani inference for diarisk.
//!
//! A [`FuzzySystem`] is built once from a [`SystemDefinition`] and then
//! evaluated any number of times:
//!
//! crisp inputs → fuzzification → rule firing → aggregation → centroid →
//! [`RiskLevel`].
//!
//! Every configuration problem surfaces as a [`ConfigError`] when the system
//! is built; evaluation only fails on missing or non-finite inputs.

pub mod aggregate;
pub mod classify;
pub mod defuzzify;
pub mod error;
pub mod explain;
pub mod input;
pub mod system;

pub use aggregate::{aggregate, consequent_strengths, AggregatedOutputSet, MAX_SAMPLES};
pub use classify::{Classifier, RiskLevel, Thresholds};
pub use defuzzify::centroid;
pub use error::{ConfigError, InputError, NoRuleFired};
pub use explain::{DominantTerm, Explanation, FiredRule, TermStrength};
pub use input::CrispInputs;
pub use system::{AssessmentResult, FuzzySystem, SystemDefinition, DEFAULT_RESOLUTION};

#[cfg(test)]
mod tests {
    use super::*;
    use diarisk_membership::{Domain, LinguisticVariable, Shape};
    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn init_test_logger() {
        INIT.call_once(|| {
            let _ = env_logger::builder()
                .is_test(true)
                .filter_level(log::LevelFilter::Debug)
                .try_init();
        });
    }

    #[test]
    fn explanation_renders_as_text() {
        init_test_logger();
        let temp = LinguisticVariable::new("temp", Domain::new(0.0, 10.0))
            .with_term("cold", Shape::left_shoulder(0.0, 2.0, 6.0))
            .with_term("hot", Shape::right_shoulder(4.0, 8.0, 10.0));
        let out = LinguisticVariable::new("risk", Domain::new(0.0, 100.0))
            .with_term("low_risk", Shape::left_shoulder(0.0, 20.0, 40.0))
            .with_term("high_risk", Shape::right_shoulder(58.0, 80.0, 100.0));
        let rules = vec![
            "IF temp IS cold THEN low_risk".parse().unwrap(),
            "IF temp IS hot THEN high_risk".parse().unwrap(),
        ];
        let system = FuzzySystem::new(SystemDefinition::new(vec![temp], out, rules)).unwrap();

        let text = system.explain(&[("temp", 12.0)]).unwrap().to_string();
        assert!(text.contains("temp = 12 (clamped to 10): hot 1.000"), "{text}");
        assert!(text.contains("#2   1.000  IF temp IS hot THEN high_risk"), "{text}");
        assert!(!text.contains("#1 "), "{text}");
    }

    #[test]
    fn explanation_names_the_dominant_term_per_input() {
        init_test_logger();
        let temp = LinguisticVariable::new("temp", Domain::new(0.0, 10.0))
            .with_term("cold", Shape::left_shoulder(0.0, 2.0, 6.0))
            .with_term("hot", Shape::right_shoulder(4.0, 8.0, 10.0));
        let wind = LinguisticVariable::new("wind", Domain::new(0.0, 10.0))
            .with_term("calm", Shape::left_shoulder(0.0, 1.0, 3.0))
            .with_term("gale", Shape::right_shoulder(7.0, 9.0, 10.0));
        let out = LinguisticVariable::new("risk", Domain::new(0.0, 100.0))
            .with_term("low_risk", Shape::left_shoulder(0.0, 20.0, 40.0))
            .with_term("high_risk", Shape::right_shoulder(58.0, 80.0, 100.0));
        let rules = vec![
            "IF temp IS cold THEN low_risk".parse().unwrap(),
            "IF temp IS hot OR wind IS gale THEN high_risk".parse().unwrap(),
        ];
        let system =
            FuzzySystem::new(SystemDefinition::new(vec![temp, wind], out, rules)).unwrap();

        // temp 5 is cold 0.25 and hot 0.25, so the earlier term wins; wind 5 matches nothing
        let explanation = system.explain(&[("temp", 5.0), ("wind", 5.0)]).unwrap();
        assert_eq!(explanation.dominant.len(), 1);
        assert_eq!(explanation.dominant[0].variable, "temp");
        assert_eq!(explanation.dominant[0].term, "cold");
        assert_eq!(explanation.dominant[0].degree, 0.25);

        let text = explanation.to_string();
        assert!(text.contains("temp = 5: cold 0.250, hot 0.250 (dominant cold)"), "{text}");
        assert!(text.contains("wind = 5: no term"), "{text}");

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["dominant"][0]["term"], "cold");
    }
}
