//! Shared fixtures for the diarisk integration tests.

use std::sync::Once;

use diarisk::diabetes;
use diarisk::{AssessmentResult, DiabetesInputs, FuzzySystem};

static INIT: Once = Once::new();

/// Initialize the logger for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    });
}

/// The built-in diabetes system.
pub fn diabetes_system() -> FuzzySystem {
    init_test_logger();
    diabetes::system().expect("built-in knowledge base is valid")
}

pub fn assess(
    system: &FuzzySystem,
    fbs: f64,
    bmi: f64,
    age: f64,
    physical_activity: f64,
) -> AssessmentResult {
    system
        .assess(&DiabetesInputs::new(fbs, bmi, age, physical_activity))
        .expect("all four inputs are supplied")
}

/// Asserts `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
