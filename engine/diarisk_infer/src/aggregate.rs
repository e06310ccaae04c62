//! Mamdani implication and aggregation.
//!
//! Each rule clips its consequent term at its firing strength (min) and the
//! clipped terms are merged pointwise (max). Because min distributes over
//! max, the strongest rule per consequent term is all that matters, so the
//! rules are reduced to one strength per output term before sampling.

use diarisk_membership::{Domain, FuzzyInputVector, LinguisticVariable};
use diarisk_rules::{Activation, RuleBase};
use serde::Serialize;

/// Output membership sampled across the output domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedOutputSet {
    domain: Domain,
    step: f64,
    samples: Vec<f64>,
}

impl AggregatedOutputSet {
    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Crisp position of sample `i`; the last sample sits on the domain maximum.
    pub fn x_at(&self, i: usize) -> f64 {
        (self.domain.min + i as f64 * self.step).min(self.domain.max)
    }

    /// `(x, membership)` pairs from the domain minimum to its maximum.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, mu)| (self.x_at(i), *mu))
    }

    /// Largest membership anywhere in the set.
    pub fn height(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }

    /// True when no sample has positive membership.
    pub fn is_empty(&self) -> bool {
        self.height() <= 0.0
    }
}

/// Upper bound on sample intervals per aggregation; finer resolutions are
/// rejected when a system is built.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Number of sample intervals covering `domain` at `step`.
pub(crate) fn intervals(domain: Domain, step: f64) -> usize {
    // tolerate widths that are an integer multiple of step up to rounding
    (domain.width() / step - 1e-9).ceil().max(0.0) as usize
}

/// Strongest firing per output term.
pub fn consequent_strengths(
    rules: &RuleBase,
    output: &LinguisticVariable,
    inputs: &FuzzyInputVector<'_>,
) -> Vec<f64> {
    let mut strengths = vec![0.0_f64; output.terms().len()];
    for rule in rules.rules() {
        let s = rule.firing_strength(inputs);
        if s <= 0.0 {
            continue;
        }
        if let Some(slot) = strengths.get_mut(rule.consequent_term()) {
            *slot = slot.max(s);
        }
    }
    strengths
}

/// Same as [`consequent_strengths`], from already computed activations.
pub fn strengths_from_activations(
    activations: &[Activation<'_>],
    output: &LinguisticVariable,
) -> Vec<f64> {
    let mut strengths = vec![0.0_f64; output.terms().len()];
    for a in activations.iter().filter(|a| a.strength > 0.0) {
        if let Some(slot) = strengths.get_mut(a.consequent_term) {
            *slot = slot.max(a.strength);
        }
    }
    strengths
}

/// Samples the union of all clipped consequent terms.
///
/// `term_strengths[t]` is the clipping level of the output term at position `t`.
pub fn aggregate(
    output: &LinguisticVariable,
    term_strengths: &[f64],
    step: f64,
) -> AggregatedOutputSet {
    let domain = output.domain();
    let active: Vec<_> = output
        .terms()
        .iter()
        .zip(term_strengths.iter().copied())
        .filter(|(_, s)| *s > 0.0)
        .collect();

    let n = intervals(domain, step);
    let samples = (0..=n)
        .map(|i| {
            let x = (domain.min + i as f64 * step).min(domain.max);
            active
                .iter()
                .map(|(term, s)| term.degree(x).min(*s))
                .fold(0.0, f64::max)
        })
        .collect();

    AggregatedOutputSet {
        domain,
        step,
        samples,
    }
}
