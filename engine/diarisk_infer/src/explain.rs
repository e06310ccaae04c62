use std::fmt;

use diarisk_membership::FuzzyInputVector;
use serde::Serialize;

use crate::system::AssessmentResult;

/// A rule that fired during one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredRule {
    pub index: usize,
    pub rule: String,
    pub consequent: String,
    pub strength: f64,
}

/// Clipping level of one output term after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermStrength<'a> {
    pub term: &'a str,
    pub strength: f64,
}

/// Input term with the highest positive degree for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DominantTerm<'a> {
    pub variable: &'a str,
    pub term: &'a str,
    pub degree: f64,
}

/// An assessment together with the stages that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation<'a> {
    pub result: AssessmentResult,
    pub inputs: FuzzyInputVector<'a>,
    /// One entry per input that matched any term, in declaration order.
    pub dominant: Vec<DominantTerm<'a>>,
    pub fired: Vec<FiredRule>,
    pub term_strengths: Vec<TermStrength<'a>>,
}

impl fmt::Display for Explanation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs:")?;
        for variable in self.inputs.iter() {
            write!(f, "  {} = {}", variable.variable, variable.crisp)?;
            if variable.was_clamped() {
                write!(f, " (clamped to {})", variable.clamped)?;
            }
            let degrees = variable
                .degrees
                .iter()
                .filter(|d| d.degree > 0.0)
                .map(|d| format!("{} {:.3}", d.term, d.degree))
                .collect::<Vec<_>>();
            if degrees.is_empty() {
                writeln!(f, ": no term")?;
                continue;
            }
            write!(f, ": {}", degrees.join(", "))?;
            match self.dominant.iter().find(|d| d.variable == variable.variable) {
                Some(d) => writeln!(f, " (dominant {})", d.term)?,
                None => writeln!(f)?,
            }
        }

        writeln!(f, "fired rules:")?;
        if self.fired.is_empty() {
            writeln!(f, "  none")?;
        }
        for fired in &self.fired {
            writeln!(f, "  #{:<3} {:.3}  {}", fired.index + 1, fired.strength, fired.rule)?;
        }

        writeln!(f, "output terms:")?;
        for t in &self.term_strengths {
            writeln!(f, "  {} {:.3}", t.term, t.strength)?;
        }
        Ok(())
    }
}
