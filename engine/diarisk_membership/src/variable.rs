use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::MembershipError;
use crate::fuzzify::{FuzzifiedVariable, TermDegree};
use crate::shape::Shape;

/// Closed crisp interval a variable is modelled over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        self.min + self.width() / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Pulls `x` back into the domain. Readings beyond the nominal range are
    /// evaluated as if they sat on the nearest edge.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    fn validate(&self, variable: &str) -> Result<(), MembershipError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(MembershipError::InvalidDomain {
                variable: variable.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// A named fuzzy set within a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub shape: Shape,
}

impl Term {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.shape.degree(x)
    }
}

/// A crisp dimension partitioned into ordered linguistic terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinguisticVariable {
    name: String,
    domain: Domain,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            terms: Vec::new(),
        }
    }

    /// Builder-style variant of [`LinguisticVariable::push_term`].
    pub fn with_term(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.push_term(name, shape);
        self
    }

    pub fn push_term(&mut self, name: impl Into<String>, shape: Shape) {
        self.terms.push(Term::new(name, shape));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Turns the outermost triangular terms into shoulders anchored at the
    /// domain edges: the first stays at one down to `min`, the last stays at
    /// one up to `max`. Trapezoids are left untouched.
    ///
    /// The declared triangles must already be ordered; a reversed outer term
    /// is reported instead of being masked by the rewrite.
    pub fn apply_shoulders(&mut self) -> Result<(), MembershipError> {
        let Domain { min, max } = self.domain;
        let last = self.terms.len().saturating_sub(1);
        for (i, term) in self.terms.iter_mut().enumerate() {
            let Shape::Triangle { a, b, c } = term.shape else {
                continue;
            };
            if i == 0 || i == last {
                // the rewrite drops one declared corner, so check them all first
                term.shape.validate(&term.name)?;
            }
            if i == 0 {
                if min > b {
                    return Err(MembershipError::ShoulderOutsideDomain {
                        variable: self.name.clone(),
                        term: term.name.clone(),
                    });
                }
                term.shape = Shape::left_shoulder(min, b, c);
            } else if i == last {
                if max < b {
                    return Err(MembershipError::ShoulderOutsideDomain {
                        variable: self.name.clone(),
                        term: term.name.clone(),
                    });
                }
                term.shape = Shape::right_shoulder(a, b, max);
            }
        }
        Ok(())
    }

    /// Checks the domain, term names and every term's shape.
    pub fn validate(&self) -> Result<(), MembershipError> {
        self.domain.validate(&self.name)?;
        if self.terms.is_empty() {
            return Err(MembershipError::NoTerms {
                variable: self.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        for term in &self.terms {
            if !seen.insert(term.name.as_str()) {
                return Err(MembershipError::DuplicateTerm {
                    variable: self.name.clone(),
                    term: term.name.clone(),
                });
            }
            term.shape.validate(&term.name)?;
        }
        Ok(())
    }

    /// Degree of `x` in every term, in declaration order.
    pub fn fuzzify(&self, x: f64) -> FuzzifiedVariable<'_> {
        let clamped = self.domain.clamp(x);
        if clamped != x {
            log::debug!(
                "{}: {x} is outside [{}, {}], evaluating at {clamped}",
                self.name,
                self.domain.min,
                self.domain.max
            );
        }
        let degrees = self
            .terms
            .iter()
            .map(|t| TermDegree {
                term: &t.name,
                degree: t.degree(clamped),
            })
            .collect();
        FuzzifiedVariable {
            variable: &self.name,
            crisp: x,
            clamped,
            degrees,
        }
    }
}
