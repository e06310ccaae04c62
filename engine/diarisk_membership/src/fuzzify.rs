//! Fuzzification results.
//!
//! Values here borrow their names from the variables that produced them and
//! live only for the duration of one evaluation.

use serde::Serialize;

use crate::variable::LinguisticVariable;

/// Degree of membership of a crisp value in one term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermDegree<'a> {
    pub term: &'a str,
    pub degree: f64,
}

/// One variable's crisp reading mapped onto all of its terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzifiedVariable<'a> {
    pub variable: &'a str,
    pub crisp: f64,
    /// The value the terms were evaluated at, after clamping to the domain.
    pub clamped: f64,
    pub degrees: Vec<TermDegree<'a>>,
}

impl<'a> FuzzifiedVariable<'a> {
    pub fn degree(&self, term: &str) -> Option<f64> {
        self.degrees
            .iter()
            .find(|d| d.term == term)
            .map(|d| d.degree)
    }

    /// Degree by term position; unknown positions have no membership.
    pub fn degree_at(&self, index: usize) -> f64 {
        self.degrees.get(index).map_or(0.0, |d| d.degree)
    }

    pub fn was_clamped(&self) -> bool {
        self.crisp != self.clamped
    }

    /// Term with the highest degree; the earliest declared wins a tie.
    pub fn dominant(&self) -> Option<TermDegree<'a>> {
        self.degrees
            .iter()
            .copied()
            .fold(None, |best: Option<TermDegree<'a>>, d| match best {
                Some(b) if b.degree >= d.degree => Some(b),
                _ => Some(d),
            })
    }
}

/// Fuzzified readings for every input variable of a system, in the order the
/// variables were declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FuzzyInputVector<'a> {
    variables: Vec<FuzzifiedVariable<'a>>,
}

impl<'a> FuzzyInputVector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            variables: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, fuzzified: FuzzifiedVariable<'a>) {
        self.variables.push(fuzzified);
    }

    pub fn get(&self, variable: &str) -> Option<&FuzzifiedVariable<'a>> {
        self.variables.iter().find(|v| v.variable == variable)
    }

    pub fn degree(&self, variable: &str, term: &str) -> Option<f64> {
        self.get(variable).and_then(|v| v.degree(term))
    }

    /// Degree by variable and term position.
    pub fn degree_at(&self, variable: usize, term: usize) -> f64 {
        self.variables
            .get(variable)
            .map_or(0.0, |v| v.degree_at(term))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FuzzifiedVariable<'a>> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Fuzzifies `x` against every term of `variable`.
pub fn fuzzify(variable: &LinguisticVariable, x: f64) -> FuzzifiedVariable<'_> {
    variable.fuzzify(x)
}
