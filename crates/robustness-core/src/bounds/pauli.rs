//! Expectation bounds for observables given as weighted Pauli sums.
//!
//! `H = c₀·I + Σ cᵢ·Pᵢ` where every `Pᵢ` satisfies `-1 <= Pᵢ <= 1`. The
//! bounded-observable bound is applied to each term and combined by the sign
//! of its coefficient.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{Method, RobustnessInterval, SpectrumBounds, expectation, validate_epsilon};
use crate::error::{IntervalError, Result};

/// One weighted Pauli term with its measured mean `<Pᵢ>_ρ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    /// Pauli string label, e.g. `"XZIY"`.
    pub label: String,
    pub coefficient: f64,
    pub mean: f64,
}

/// Weighted sum of Pauli terms plus an identity offset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PauliSum {
    #[serde(default)]
    pub constant: f64,
    pub terms: Vec<PauliTerm>,
}

impl PauliSum {
    pub fn new(constant: f64) -> Self {
        Self {
            constant,
            terms: Vec::new(),
        }
    }

    /// Add a term (builder style).
    pub fn with_term(mut self, label: impl Into<String>, coefficient: f64, mean: f64) -> Self {
        self.push(label, coefficient, mean);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, coefficient: f64, mean: f64) {
        self.terms.push(PauliTerm {
            label: label.into(),
            coefficient,
            mean,
        });
    }

    /// `<H>_ρ` assembled from the term means.
    pub fn mean(&self) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|t| t.coefficient * t.mean)
                .sum::<f64>()
    }

    /// Spectral range implied by the Pauli norms: `c₀ ∓ Σ|cᵢ|`.
    pub fn spectrum_bounds(&self) -> SpectrumBounds {
        let spread: f64 = self.terms.iter().map(|t| t.coefficient.abs()).sum();
        SpectrumBounds {
            lower: self.constant - spread,
            upper: self.constant + spread,
        }
    }

    /// Term-wise expectation bound on `<H>_σ`.
    ///
    /// A term whose bound is out of range fails the whole sum. For a negative
    /// coefficient the reported side is the side of `H` that term would feed.
    pub fn expectation_interval(&self, epsilon: f64) -> Result<RobustnessInterval> {
        validate_epsilon(epsilon)?;
        if !self.constant.is_finite() {
            return Err(IntervalError::validation(
                "constant",
                self.constant,
                "a finite value",
            ));
        }

        let mut lower = self.constant;
        let mut upper = self.constant;
        for (i, term) in self.terms.iter().enumerate() {
            let c = term.coefficient;
            if !c.is_finite() {
                return Err(IntervalError::validation(
                    "coefficient",
                    c,
                    "a finite value",
                ));
            }
            if c == 0.0 {
                continue;
            }
            let iv = expectation(term.mean, epsilon).map_err(|e| match e {
                IntervalError::OutOfRange {
                    side,
                    epsilon,
                    max_epsilon,
                } => {
                    let side = if c < 0.0 { side.opposite() } else { side };
                    warn!(
                        "term {i} ({}) with mean {} cannot bound the {side} side at epsilon {epsilon}",
                        term.label, term.mean
                    );
                    IntervalError::OutOfRange {
                        side,
                        epsilon,
                        max_epsilon,
                    }
                }
                other => other,
            })?;
            if c > 0.0 {
                lower += c * iv.lower;
                upper += c * iv.upper;
            } else {
                lower += c * iv.upper;
                upper += c * iv.lower;
            }
        }

        Ok(RobustnessInterval {
            method: Method::Expectation,
            epsilon,
            lower,
            point_estimate: self.mean(),
            upper,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Side;

    fn h2_like() -> PauliSum {
        PauliSum::new(-0.5)
            .with_term("ZI", 0.4, 0.9)
            .with_term("IZ", -0.4, -0.9)
            .with_term("XX", 0.2, -0.3)
    }

    #[test]
    fn mean_sums_terms() {
        let h = h2_like();
        let expected = -0.5 + 0.4 * 0.9 + (-0.4) * (-0.9) + 0.2 * (-0.3);
        assert!((h.mean() - expected).abs() < 1e-12);
    }

    #[test]
    fn spectrum_from_coefficients() {
        let s = h2_like().spectrum_bounds();
        assert!((s.lower - (-1.5)).abs() < 1e-12);
        assert!((s.upper - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_epsilon_collapses_to_mean() {
        let h = h2_like();
        let iv = h.expectation_interval(0.0).unwrap();
        assert!((iv.lower - h.mean()).abs() < 1e-12);
        assert!((iv.upper - h.mean()).abs() < 1e-12);
    }

    #[test]
    fn interval_contains_mean() {
        let h = h2_like();
        let iv = h.expectation_interval(0.04).unwrap();
        assert!(iv.lower <= h.mean() && h.mean() <= iv.upper);
        assert!(iv.width() > 0.0);
    }

    #[test]
    fn single_positive_term_matches_scalar_bound() {
        let h = PauliSum::new(1.0).with_term("Z", 2.0, 0.3);
        let scalar = expectation(0.3, 0.1).unwrap();
        let iv = h.expectation_interval(0.1).unwrap();
        assert!((iv.lower - (1.0 + 2.0 * scalar.lower)).abs() < 1e-12);
        assert!((iv.upper - (1.0 + 2.0 * scalar.upper)).abs() < 1e-12);
    }

    #[test]
    fn negative_coefficient_swaps_sides() {
        let h = PauliSum::new(0.0).with_term("Z", -1.0, 0.3);
        let scalar = expectation(0.3, 0.1).unwrap();
        let iv = h.expectation_interval(0.1).unwrap();
        assert!((iv.lower + scalar.upper).abs() < 1e-12);
        assert!((iv.upper + scalar.lower).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_side_follows_coefficient_sign() {
        // Term mean 0.9: upper side of the term fails above epsilon 0.05.
        let h = PauliSum::new(0.0).with_term("Z", -1.0, 0.9);
        let err = h.expectation_interval(0.1).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::OutOfRange {
                side: Side::Lower,
                ..
            }
        ));
    }

    #[test]
    fn zero_coefficient_terms_are_skipped() {
        let h = PauliSum::new(0.0).with_term("Z", 0.0, 1.0);
        let iv = h.expectation_interval(0.4).unwrap();
        assert_eq!(iv.lower, 0.0);
        assert_eq!(iv.upper, 0.0);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"constant": -0.1, "terms": [{"label": "ZZ", "coefficient": 0.5, "mean": 0.2}]}"#;
        let h: PauliSum = serde_json::from_str(json).unwrap();
        assert_eq!(h.terms.len(), 1);
        assert!((h.mean() - 0.0).abs() < 1e-12);
    }
}
