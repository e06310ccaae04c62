use std::collections::{BTreeMap, HashMap};

/// Crisp readings keyed by input variable name.
pub trait CrispInputs {
    fn value(&self, variable: &str) -> Option<f64>;
}

impl<T: CrispInputs + ?Sized> CrispInputs for &T {
    fn value(&self, variable: &str) -> Option<f64> {
        (**self).value(variable)
    }
}

impl CrispInputs for HashMap<String, f64> {
    fn value(&self, variable: &str) -> Option<f64> {
        self.get(variable).copied()
    }
}

impl CrispInputs for BTreeMap<String, f64> {
    fn value(&self, variable: &str) -> Option<f64> {
        self.get(variable).copied()
    }
}

impl CrispInputs for [(&str, f64)] {
    fn value(&self, variable: &str) -> Option<f64> {
        self.iter()
            .find(|(name, _)| *name == variable)
            .map(|(_, v)| *v)
    }
}

impl<const N: usize> CrispInputs for [(&str, f64); N] {
    fn value(&self, variable: &str) -> Option<f64> {
        self.as_slice().value(variable)
    }
}
