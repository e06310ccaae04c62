//! Membership function shapes.
//!
//! Every shape reduces to a trapezoid `(a, b, c, d)` with `a <= b <= c <= d`:
//! zero outside `[a, d]`, rising over `[a, b]`, flat at one over `[b, c]` and
//! falling over `[c, d]`. Collapsed edges (`a == b` or `c == d`) act as steps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MembershipError;

/// Shape of a fuzzy set over a crisp axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Triangle with feet at `a` and `c` and its peak at `b`.
    Triangle { a: f64, b: f64, c: f64 },
    /// Trapezoid with feet at `a` and `d` and a plateau over `[b, c]`.
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
}

impl Shape {
    pub fn triangle(a: f64, b: f64, c: f64) -> Self {
        Shape::Triangle { a, b, c }
    }

    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Self {
        Shape::Trapezoid { a, b, c, d }
    }

    /// Flat at one from `min` up to `peak`, then falling to zero at `end`.
    pub fn left_shoulder(min: f64, peak: f64, end: f64) -> Self {
        Shape::Trapezoid {
            a: min,
            b: min,
            c: peak,
            d: end,
        }
    }

    /// Rising from `start` to `peak`, then flat at one up to `max`.
    pub fn right_shoulder(start: f64, peak: f64, max: f64) -> Self {
        Shape::Trapezoid {
            a: start,
            b: peak,
            c: max,
            d: max,
        }
    }

    /// The equivalent trapezoid corners `[a, b, c, d]`.
    pub fn corners(&self) -> [f64; 4] {
        match *self {
            Shape::Triangle { a, b, c } => [a, b, b, c],
            Shape::Trapezoid { a, b, c, d } => [a, b, c, d],
        }
    }

    /// Parameters as they were declared (three for a triangle, four for a trapezoid).
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Shape::Triangle { a, b, c } => vec![a, b, c],
            Shape::Trapezoid { a, b, c, d } => vec![a, b, c, d],
        }
    }

    /// Checks that all parameters are finite and ordered.
    pub fn validate(&self, term: &str) -> Result<(), MembershipError> {
        let params = self.params();
        if params.iter().any(|p| !p.is_finite()) {
            return Err(MembershipError::NonFiniteParameter {
                term: term.to_string(),
                params,
            });
        }
        if params.windows(2).any(|w| w[0] > w[1]) {
            return Err(MembershipError::NonMonotonic {
                term: term.to_string(),
                params,
            });
        }
        Ok(())
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.corners();
        if x.is_nan() || x < a || x > d {
            return 0.0;
        }
        let mu = if x < b {
            // a < b here, otherwise x < a would have returned
            (x - a) / (b - a)
        } else if x <= c {
            1.0
        } else {
            // c < x <= d, so c < d
            (d - x) / (d - c)
        };
        mu.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Shape::Triangle { a, b, c } => write!(f, "triangle({a}, {b}, {c})"),
            Shape::Trapezoid { a, b, c, d } => write!(f, "trapezoid({a}, {b}, {c}, {d})"),
        }
    }
}
