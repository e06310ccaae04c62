//! Built-in diabetes risk knowledge base.
//!
//! Four inputs (fasting blood sugar, body-mass index, age and weekly
//! physical activity) feed 37 hand-authored rules concluding on a `risk`
//! score over `[0, 100]`.

use diarisk_infer::{AssessmentResult, CrispInputs, FuzzySystem, InputError, Thresholds};
use serde::{Deserialize, Serialize};

use crate::knowledge::{KnowledgeBase, KnowledgeBaseError, TermSpec, VariableSpec};

pub const FBS: &str = "fbs";
pub const BMI: &str = "bmi";
pub const AGE: &str = "age";
pub const PHYSICAL_ACTIVITY: &str = "physical_activity";
pub const RISK: &str = "risk";

/// One patient's readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiabetesInputs {
    /// Fasting blood sugar, mg/dL.
    pub fbs: f64,
    /// Body-mass index, kg/m².
    pub bmi: f64,
    /// Years.
    pub age: f64,
    /// Minutes per week.
    pub physical_activity: f64,
}

impl DiabetesInputs {
    pub fn new(fbs: f64, bmi: f64, age: f64, physical_activity: f64) -> Self {
        Self {
            fbs,
            bmi,
            age,
            physical_activity,
        }
    }
}

impl CrispInputs for DiabetesInputs {
    fn value(&self, variable: &str) -> Option<f64> {
        match variable {
            FBS => Some(self.fbs),
            BMI => Some(self.bmi),
            AGE => Some(self.age),
            PHYSICAL_ACTIVITY => Some(self.physical_activity),
            _ => None,
        }
    }
}

const RULES: &[&str] = &[
    // high risk
    "IF fbs IS diabetic THEN risk IS high_risk",
    "IF fbs IS prediabetic AND bmi IS obese AND age IS old THEN risk IS high_risk",
    "IF fbs IS prediabetic AND bmi IS obese AND physical_activity IS low THEN risk IS high_risk",
    "IF bmi IS obese AND age IS very_old AND physical_activity IS low THEN risk IS high_risk",
    "IF bmi IS obese AND age IS old AND physical_activity IS low THEN risk IS high_risk",
    "IF fbs IS prediabetic AND bmi IS overweight AND age IS old AND physical_activity IS low THEN risk IS high_risk",
    "IF fbs IS prediabetic AND age IS very_old THEN risk IS high_risk",
    "IF fbs IS prediabetic AND age IS old AND physical_activity IS low THEN risk IS high_risk",
    "IF age IS very_old AND physical_activity IS low THEN risk IS high_risk",
    "IF age IS old AND bmi IS normal AND physical_activity IS low THEN risk IS high_risk",
    // moderate risk
    "IF fbs IS prediabetic AND bmi IS normal AND age IS middle THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND bmi IS normal AND age IS young THEN risk IS moderate_risk",
    "IF fbs IS normal AND bmi IS obese AND age IS middle AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF bmi IS overweight AND age IS middle AND physical_activity IS low THEN risk IS moderate_risk",
    "IF bmi IS obese AND age IS young THEN risk IS moderate_risk",
    "IF age IS old AND physical_activity IS low THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND bmi IS overweight AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF age IS old AND fbs IS normal AND physical_activity IS low THEN risk IS moderate_risk",
    "IF age IS very_old AND fbs IS normal THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND age IS middle THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND bmi IS overweight THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND physical_activity IS low THEN risk IS moderate_risk",
    "IF fbs IS prediabetic AND bmi IS normal AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF age IS very_old AND fbs IS normal AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF fbs IS normal AND bmi IS normal AND age IS old AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF fbs IS normal AND bmi IS overweight AND age IS middle AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF fbs IS normal AND bmi IS obese AND age IS old AND physical_activity IS moderate THEN risk IS moderate_risk",
    "IF fbs IS normal AND bmi IS obese AND age IS old AND physical_activity IS high THEN risk IS moderate_risk",
    "IF fbs IS low AND bmi IS obese AND age IS young AND physical_activity IS high THEN risk IS moderate_risk",
    // low risk
    "IF fbs IS normal AND bmi IS normal AND age IS young AND physical_activity IS high THEN risk IS low_risk",
    "IF fbs IS normal AND bmi IS normal AND age IS young THEN risk IS low_risk",
    "IF fbs IS normal AND bmi IS normal AND physical_activity IS high THEN risk IS low_risk",
    "IF fbs IS normal AND bmi IS normal AND age IS middle THEN risk IS low_risk",
    "IF physical_activity IS high AND age IS young AND fbs IS normal THEN risk IS low_risk",
    "IF physical_activity IS high AND age IS young AND bmi IS normal THEN risk IS low_risk",
    "IF fbs IS normal AND physical_activity IS high AND age IS young AND bmi IS normal THEN risk IS low_risk",
    "IF fbs IS low THEN risk IS low_risk",
];

fn terms(defs: &[(&str, [f64; 3])]) -> Vec<TermSpec> {
    defs.iter()
        .map(|(name, params)| TermSpec::new(name, params))
        .collect()
}

/// The diabetes knowledge base as data.
pub fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase {
        resolution: diarisk_infer::DEFAULT_RESOLUTION,
        rules: RULES.iter().map(|r| r.to_string()).collect(),
        thresholds: Thresholds::default(),
        inputs: vec![
            VariableSpec::new(
                FBS,
                [50.0, 200.0],
                terms(&[
                    ("low", [50.0, 70.0, 90.0]),
                    ("normal", [85.0, 95.0, 106.0]),
                    ("prediabetic", [98.0, 110.0, 122.0]),
                    ("diabetic", [120.0, 150.0, 180.0]),
                ]),
            ),
            VariableSpec::new(
                BMI,
                [10.0, 45.0],
                terms(&[
                    ("underweight", [10.0, 15.0, 18.5]),
                    ("normal", [17.0, 22.0, 24.9]),
                    ("overweight", [23.0, 26.0, 30.0]),
                    ("obese", [28.0, 35.0, 45.0]),
                ]),
            ),
            VariableSpec::new(
                AGE,
                [15.0, 90.0],
                terms(&[
                    ("young", [15.0, 25.0, 35.0]),
                    ("middle", [33.0, 45.0, 57.0]),
                    ("old", [53.0, 65.0, 77.0]),
                    ("very_old", [72.0, 80.0, 90.0]),
                ]),
            ),
            VariableSpec::new(
                PHYSICAL_ACTIVITY,
                [0.0, 300.0],
                terms(&[
                    ("low", [0.0, 40.0, 80.0]),
                    ("moderate", [60.0, 110.0, 170.0]),
                    ("high", [150.0, 200.0, 300.0]),
                ]),
            ),
        ],
        output: VariableSpec::new(
            RISK,
            [0.0, 100.0],
            terms(&[
                ("low_risk", [0.0, 20.0, 40.0]),
                ("moderate_risk", [30.0, 50.0, 60.0]),
                ("high_risk", [58.0, 80.0, 100.0]),
            ]),
        ),
    }
}

/// Builds the diabetes risk system.
pub fn system() -> Result<FuzzySystem, KnowledgeBaseError> {
    knowledge_base().build()
}

/// Assesses one patient against a diabetes system.
pub fn assess(
    system: &FuzzySystem,
    inputs: &DiabetesInputs,
) -> Result<AssessmentResult, InputError> {
    system.assess(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diarisk_infer::RiskLevel;
    use pretty_assertions::assert_eq;

    #[test]
    fn knowledge_base_builds() {
        let system = system().unwrap();
        assert_eq!(system.inputs().len(), 4);
        assert_eq!(system.rules().len(), 37);
        assert_eq!(system.output().name(), RISK);
    }

    #[test]
    fn moderate_reference_case() {
        let system = system().unwrap();
        let result = assess(&system, &DiabetesInputs::new(110.0, 27.5, 45.0, 45.0)).unwrap();
        assert!((result.crisp_value - 46.6667).abs() < 0.01, "{result:?}");
        assert_eq!(result.classification, RiskLevel::Moderate);
        assert!(!result.fallback);
    }

    #[test]
    fn inputs_expose_every_variable() {
        let inputs = DiabetesInputs::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(inputs.value(FBS), Some(1.0));
        assert_eq!(inputs.value(PHYSICAL_ACTIVITY), Some(4.0));
        assert_eq!(inputs.value("glucose"), None);
    }
}
