//! Closed-form robustness intervals.
//!
//! Given moments of an observable `A` measured on an approximate state ρ and
//! an upper bound `epsilon` on the infidelity between ρ and an inaccessible
//! target state σ, each method returns an interval guaranteed to contain the
//! target-state quantity:
//!
//! - **Expectation**: `-1 <= A <= 1`, needs `<A>` only. Bounds `<A>_σ`.
//! - **GramianExpectation**: `A >= 0`, needs `<A>` and `<A²>`. Lower bound on
//!   `<A>_σ` only; the upper side is `+inf`.
//! - **GramianEigenvalue**: σ is an eigenstate of `A`, needs `<A>` and `<A²>`.
//!   Bounds the eigenvalue. Usually the tightest of the three.
//!
//! All functions are pure. The returned `point_estimate` is always the raw
//! measured mean.

pub mod pauli;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Caller-supplied precondition on the observable. Not checked numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservableKind {
    /// Operator norm bounded: `-1 <= A <= 1` (e.g. a Pauli string).
    Bounded,
    /// Positive semi-definite: `A >= 0`.
    Nonnegative,
    /// The target state is an eigenstate of `A` (e.g. a ground state of `H`).
    EigenstateTarget,
}

impl ObservableKind {
    /// Interval method used for this kind of observable.
    pub fn method(self) -> Method {
        match self {
            Self::Bounded => Method::Expectation,
            Self::Nonnegative => Method::GramianExpectation,
            Self::EigenstateTarget => Method::GramianEigenvalue,
        }
    }

    /// Whether the method for this kind needs the second moment `<A²>`.
    pub fn needs_second_moment(self) -> bool {
        !matches!(self, Self::Bounded)
    }
}

impl std::fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounded => write!(f, "bounded"),
            Self::Nonnegative => write!(f, "nonnegative"),
            Self::EigenstateTarget => write!(f, "eigenstate_target"),
        }
    }
}

/// Closed-form bound used to produce an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Expectation,
    GramianExpectation,
    GramianEigenvalue,
    /// Two-sided Gramian bound from known spectral edges, see
    /// [`gramian_expectation_shifted`].
    ShiftedGramianExpectation,
    /// Intersection of intervals from several methods, see [`tightest`].
    Intersection,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expectation => write!(f, "expectation"),
            Self::GramianExpectation => write!(f, "gramian_expectation"),
            Self::GramianEigenvalue => write!(f, "gramian_eigenvalue"),
            Self::ShiftedGramianExpectation => write!(f, "shifted_gramian_expectation"),
            Self::Intersection => write!(f, "intersection"),
        }
    }
}

/// Side of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Lower,
    Upper,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lower => write!(f, "lower"),
            Self::Upper => write!(f, "upper"),
        }
    }
}

/// First and (optionally) second moment of an observable on the approximate state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// `<A>_ρ`.
    pub mean: f64,
    /// `<A²>_ρ`, required by the Gramian methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_sq: Option<f64>,
}

impl Moments {
    pub fn first(mean: f64) -> Self {
        Self {
            mean,
            mean_sq: None,
        }
    }

    pub fn new(mean: f64, mean_sq: f64) -> Self {
        Self {
            mean,
            mean_sq: Some(mean_sq),
        }
    }

    /// `max(0, <A²> - <A>²)`, or `None` without a second moment.
    pub fn variance(&self) -> Option<f64> {
        self.mean_sq.map(|sq| clamped_variance(self.mean, sq))
    }
}

/// Known spectral range `lower <= A <= upper` of an observable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumBounds {
    pub lower: f64,
    pub upper: f64,
}

impl SpectrumBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() {
            return Err(IntervalError::validation(
                "spectrum lower bound",
                lower,
                "a finite value",
            ));
        }
        if !upper.is_finite() || upper < lower {
            return Err(IntervalError::validation(
                "spectrum upper bound",
                upper,
                "a finite value not below the lower bound",
            ));
        }
        Ok(Self { lower, upper })
    }
}

/// Interval guaranteed to contain the target-state quantity.
///
/// A side a method cannot bound is `-inf` / `+inf` (serialized as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobustnessInterval {
    pub method: Method,
    pub epsilon: f64,
    #[serde(with = "lower_bound")]
    pub lower: f64,
    pub point_estimate: f64,
    #[serde(with = "upper_bound")]
    pub upper: f64,
}

impl RobustnessInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
        return Err(IntervalError::validation(
            "epsilon",
            epsilon,
            "a value in [0, 1]",
        ));
    }
    Ok(())
}

fn validate_finite(parameter: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(IntervalError::validation(parameter, value, "a finite value"));
    }
    Ok(())
}

fn validate_second_moment(mean_sq: f64) -> Result<()> {
    if !mean_sq.is_finite() || mean_sq < 0.0 {
        return Err(IntervalError::validation(
            "mean_sq",
            mean_sq,
            "a finite non-negative second moment",
        ));
    }
    Ok(())
}

fn clamped_variance(mean: f64, mean_sq: f64) -> f64 {
    let raw = mean_sq - mean * mean;
    if raw < 0.0 {
        debug!("negative variance {raw:e} from noisy moments, clamped to 0");
        0.0
    } else {
        raw
    }
}

/// Convert a fidelity lower bound `F` into the infidelity bound `1 - F`.
pub fn epsilon_from_fidelity(fidelity: f64) -> Result<f64> {
    if !fidelity.is_finite() || !(0.0..=1.0).contains(&fidelity) {
        return Err(IntervalError::validation(
            "fidelity",
            fidelity,
            "a value in [0, 1]",
        ));
    }
    Ok(1.0 - fidelity)
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

/// Compute the interval for `kind`, dispatching to the matching method.
pub fn compute(kind: ObservableKind, moments: Moments, epsilon: f64) -> Result<RobustnessInterval> {
    let method = kind.method();
    match kind {
        ObservableKind::Bounded => expectation(moments.mean, epsilon),
        ObservableKind::Nonnegative => {
            let mean_sq = require_second_moment(method, moments)?;
            gramian_expectation(moments.mean, mean_sq, epsilon)
        }
        ObservableKind::EigenstateTarget => {
            let mean_sq = require_second_moment(method, moments)?;
            gramian_eigenvalue(moments.mean, mean_sq, epsilon)
        }
    }
}

fn require_second_moment(method: Method, moments: Moments) -> Result<f64> {
    moments
        .mean_sq
        .ok_or_else(|| IntervalError::domain(method, "second moment <A^2> is required"))
}

/// Expectation-value bound for an observable with `-1 <= A <= 1`.
///
/// The lower side exists for `epsilon <= (1 + mean) / 2`, the upper side for
/// `epsilon <= (1 - mean) / 2`. If both are exceeded the side with the smaller
/// threshold is reported.
pub fn expectation(mean: f64, epsilon: f64) -> Result<RobustnessInterval> {
    validate_epsilon(epsilon)?;
    validate_finite("mean", mean)?;

    let max_lower = (1.0 + mean) / 2.0;
    let max_upper = (1.0 - mean) / 2.0;
    let failed = match (epsilon <= max_lower, epsilon <= max_upper) {
        (true, true) => None,
        (true, false) => Some((Side::Upper, max_upper)),
        (false, true) => Some((Side::Lower, max_lower)),
        (false, false) if max_upper <= max_lower => Some((Side::Upper, max_upper)),
        (false, false) => Some((Side::Lower, max_lower)),
    };
    if let Some((side, max_epsilon)) = failed {
        return Err(IntervalError::OutOfRange {
            side,
            epsilon,
            max_epsilon,
        });
    }

    let mean_sq = (mean * mean).min(1.0);
    let center = (1.0 - 2.0 * epsilon) * mean;
    let radius = 2.0 * (epsilon * (1.0 - epsilon) * (1.0 - mean_sq).max(0.0)).sqrt();

    Ok(RobustnessInterval {
        method: Method::Expectation,
        epsilon,
        lower: center - radius,
        point_estimate: mean,
        upper: center + radius,
    })
}

/// Gramian lower bound on `<A>_σ` for `A >= 0`. The upper side is `+inf`.
///
/// ```text
/// lower = (1 - 2ε)·mean - 2·sqrt(ε(1 - ε))·sqrt(var) + ε·<A²>/mean
/// ```
///
/// The closed form is the tight bound only while
/// `ε <= mean² / (mean² + var) = mean² / <A²>`, the point where it reaches
/// zero. Past that the minimising state has no overlap with `A|ψ⟩` and the
/// bound is the trivial `0`; the bare formula would rise again and is not a
/// valid bound there.
pub fn gramian_expectation(mean: f64, mean_sq: f64, epsilon: f64) -> Result<RobustnessInterval> {
    validate_epsilon(epsilon)?;
    validate_finite("mean", mean)?;
    validate_second_moment(mean_sq)?;
    if mean <= 0.0 {
        return Err(IntervalError::domain(
            Method::GramianExpectation,
            format!("mean must be positive, got {mean}"),
        ));
    }

    let variance = clamped_variance(mean, mean_sq);
    let threshold = mean * mean / (mean * mean + variance);
    let lower = if epsilon <= threshold {
        (1.0 - 2.0 * epsilon) * mean - 2.0 * (epsilon * (1.0 - epsilon)).sqrt() * variance.sqrt()
            + epsilon * mean_sq / mean
    } else {
        debug!("epsilon {epsilon} past gramian threshold {threshold:.6}, using trivial bound 0");
        0.0
    };

    Ok(RobustnessInterval {
        method: Method::GramianExpectation,
        epsilon,
        lower: lower.max(0.0),
        point_estimate: mean,
        upper: f64::INFINITY,
    })
}

/// Gramian eigenvalue bound: `mean ± sqrt(variance) * sqrt(epsilon / (1 - epsilon))`.
pub fn gramian_eigenvalue(mean: f64, mean_sq: f64, epsilon: f64) -> Result<RobustnessInterval> {
    validate_epsilon(epsilon)?;
    validate_finite("mean", mean)?;
    validate_second_moment(mean_sq)?;
    if epsilon >= 1.0 {
        return Err(IntervalError::domain(
            Method::GramianEigenvalue,
            "epsilon must be below 1",
        ));
    }

    let variance = clamped_variance(mean, mean_sq);
    let width = variance.sqrt() * (epsilon / (1.0 - epsilon)).sqrt();

    Ok(RobustnessInterval {
        method: Method::GramianEigenvalue,
        epsilon,
        lower: mean - width,
        point_estimate: mean,
        upper: mean + width,
    })
}

/// Two-sided Gramian expectation bound for an observable with known spectrum.
///
/// The lower side bounds `A - spectrum.lower >= 0`, the upper side bounds
/// `spectrum.upper - A >= 0`. A shifted mean of zero leaves only the spectral
/// edge on that side.
pub fn gramian_expectation_shifted(
    moments: Moments,
    epsilon: f64,
    spectrum: SpectrumBounds,
) -> Result<RobustnessInterval> {
    validate_epsilon(epsilon)?;
    let mean = moments.mean;
    validate_finite("mean", mean)?;
    let mean_sq = require_second_moment(Method::ShiftedGramianExpectation, moments)?;
    validate_second_moment(mean_sq)?;

    let (lo, hi) = (spectrum.lower, spectrum.upper);

    let below_mean = mean - lo;
    let lower = if below_mean > 0.0 {
        let shifted_sq = (mean_sq - 2.0 * lo * mean + lo * lo).max(0.0);
        lo + gramian_expectation(below_mean, shifted_sq, epsilon)?.lower
    } else {
        lo
    };

    let above_mean = hi - mean;
    let upper = if above_mean > 0.0 {
        let shifted_sq = (hi * hi - 2.0 * hi * mean + mean_sq).max(0.0);
        hi - gramian_expectation(above_mean, shifted_sq, epsilon)?.lower
    } else {
        hi
    };

    Ok(RobustnessInterval {
        method: Method::ShiftedGramianExpectation,
        epsilon,
        lower,
        point_estimate: mean,
        upper,
    })
}

/// Intersect intervals for the same observable computed by different methods.
pub fn tightest(intervals: &[RobustnessInterval]) -> Result<RobustnessInterval> {
    let first = intervals
        .first()
        .ok_or(IntervalError::InsufficientSamples { got: 0 })?;

    let lower = intervals
        .iter()
        .map(|iv| iv.lower)
        .fold(f64::NEG_INFINITY, f64::max);
    let upper = intervals
        .iter()
        .map(|iv| iv.upper)
        .fold(f64::INFINITY, f64::min);
    let epsilon = intervals.iter().map(|iv| iv.epsilon).fold(0.0, f64::max);

    if lower > upper {
        return Err(IntervalError::domain(
            Method::Intersection,
            format!("intervals are disjoint (max lower {lower} > min upper {upper})"),
        ));
    }

    Ok(RobustnessInterval {
        method: Method::Intersection,
        epsilon,
        lower,
        point_estimate: first.point_estimate,
        upper,
    })
}

// ---------------------------------------------------------------------------
// Serde for open interval sides
// ---------------------------------------------------------------------------

fn serialize_side<S: serde::Serializer>(value: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    if value.is_finite() {
        s.serialize_some(value)
    } else {
        s.serialize_none()
    }
}

mod lower_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        super::serialize_side(value, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NEG_INFINITY))
    }
}

mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        super::serialize_side(value, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn grid(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..=n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Expectation method
    // -----------------------------------------------------------------------

    #[test]
    fn expectation_zero_epsilon_is_exact() {
        for mean in grid(40, -1.0, 1.0) {
            let iv = expectation(mean, 0.0).unwrap();
            assert_eq!(iv.lower, mean);
            assert_eq!(iv.upper, mean);
            assert_eq!(iv.point_estimate, mean);
        }
    }

    #[test]
    fn expectation_contains_point_estimate() {
        for mean in grid(20, -0.95, 0.95) {
            let max_eps = (1.0 - mean.abs()) / 2.0;
            for epsilon in grid(10, 0.0, max_eps) {
                let iv = expectation(mean, epsilon).unwrap();
                assert!(
                    iv.lower <= iv.point_estimate + TOL && iv.point_estimate <= iv.upper + TOL,
                    "mean={mean} eps={epsilon} -> [{}, {}]",
                    iv.lower,
                    iv.upper
                );
            }
        }
    }

    #[test]
    fn expectation_width_monotone_in_epsilon() {
        for mean in [-0.6, -0.2, 0.0, 0.3, 0.7] {
            let max_eps = (1.0 - f64::abs(mean)) / 2.0;
            let mut previous = 0.0;
            for epsilon in grid(25, 0.0, max_eps) {
                let width = expectation(mean, epsilon).unwrap().width();
                assert!(width + TOL >= previous, "width shrank at eps={epsilon}");
                previous = width;
            }
        }
    }

    #[test]
    fn expectation_upper_out_of_range() {
        let err = expectation(0.5, 0.3).unwrap_err();
        match err {
            IntervalError::OutOfRange {
                side,
                epsilon,
                max_epsilon,
            } => {
                assert_eq!(side, Side::Upper);
                assert_eq!(epsilon, 0.3);
                assert!((max_epsilon - 0.25).abs() < TOL);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expectation_lower_out_of_range() {
        let err = expectation(-0.5, 0.3).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::OutOfRange {
                side: Side::Lower,
                ..
            }
        ));
    }

    #[test]
    fn expectation_both_sides_reports_tighter() {
        // max_upper = 0.4, max_lower = 0.6
        let err = expectation(0.2, 0.9).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::OutOfRange {
                side: Side::Upper,
                ..
            }
        ));
    }

    #[test]
    fn expectation_at_unit_mean() {
        for mean in [-1.0, 1.0] {
            let iv = expectation(mean, 0.0).unwrap();
            assert_eq!(iv.width(), 0.0);
            assert!(!iv.lower.is_nan());
        }
        assert!(matches!(
            expectation(1.0, 0.01),
            Err(IntervalError::OutOfRange {
                side: Side::Upper,
                ..
            })
        ));
    }

    #[test]
    fn expectation_known_value() {
        // center = 0.8 * 0.5 = 0.4, radius = 2 * sqrt(0.1 * 0.9 * 0.75)
        let iv = expectation(0.5, 0.1).unwrap();
        let radius = 2.0 * (0.1f64 * 0.9 * 0.75).sqrt();
        assert!((iv.lower - (0.4 - radius)).abs() < TOL);
        assert!((iv.upper - (0.4 + radius)).abs() < TOL);
    }

    // -----------------------------------------------------------------------
    // Epsilon validation
    // -----------------------------------------------------------------------

    #[test]
    fn all_methods_reject_bad_epsilon() {
        for epsilon in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                expectation(0.1, epsilon),
                Err(IntervalError::Validation {
                    parameter: "epsilon",
                    ..
                })
            ));
            assert!(matches!(
                gramian_expectation(0.5, 0.3, epsilon),
                Err(IntervalError::Validation {
                    parameter: "epsilon",
                    ..
                })
            ));
            assert!(matches!(
                gramian_eigenvalue(0.5, 0.3, epsilon),
                Err(IntervalError::Validation {
                    parameter: "epsilon",
                    ..
                })
            ));
        }
    }

    #[test]
    fn epsilon_checked_before_domain() {
        // Both epsilon and mean are invalid; epsilon wins.
        assert!(matches!(
            gramian_expectation(-1.0, 1.0, 2.0),
            Err(IntervalError::Validation { .. })
        ));
    }

    #[test]
    fn fidelity_conversion() {
        assert!((epsilon_from_fidelity(0.95).unwrap() - 0.05).abs() < TOL);
        assert_eq!(epsilon_from_fidelity(1.0).unwrap(), 0.0);
        assert!(epsilon_from_fidelity(1.5).is_err());
    }

    // -----------------------------------------------------------------------
    // Gramian expectation
    // -----------------------------------------------------------------------

    #[test]
    fn gramian_expectation_rejects_nonpositive_mean() {
        for mean in [0.0, -0.5] {
            let err = gramian_expectation(mean, 1.0, 0.1).unwrap_err();
            assert!(matches!(
                err,
                IntervalError::Domain {
                    method: Method::GramianExpectation,
                    ..
                }
            ));
        }
    }

    #[test]
    fn gramian_expectation_formula() {
        let (mean, mean_sq, eps): (f64, f64, f64) = (2.0, 4.5, 0.05);
        let variance: f64 = 0.5;
        let expected = (1.0 - 2.0 * eps) * mean
            - 2.0 * (eps * (1.0 - eps)).sqrt() * variance.sqrt()
            + eps * mean_sq / mean;
        let iv = gramian_expectation(mean, mean_sq, eps).unwrap();
        assert!((iv.lower - expected).abs() < TOL);
        assert_eq!(iv.upper, f64::INFINITY);
        assert_eq!(iv.point_estimate, mean);
        assert!(iv.lower <= mean);
    }

    #[test]
    fn gramian_expectation_trivial_past_threshold() {
        // threshold = 1 / (1 + 3) = 0.25; the bare formula gives ~0.268 here
        let iv = gramian_expectation(1.0, 4.0, 0.5).unwrap();
        assert_eq!(iv.lower, 0.0);
        assert!(iv.lower <= iv.point_estimate);
    }

    #[test]
    fn gramian_expectation_continuous_at_threshold() {
        // At the threshold the closed form reaches the trivial bound.
        let iv = gramian_expectation(1.0, 4.0, 0.25).unwrap();
        assert!(iv.lower.abs() < 1e-12);
    }

    #[test]
    fn gramian_expectation_requires_second_moment() {
        let err = compute(ObservableKind::Nonnegative, Moments::first(0.5), 0.1).unwrap_err();
        assert!(matches!(err, IntervalError::Domain { .. }));
    }

    // -----------------------------------------------------------------------
    // Gramian eigenvalue
    // -----------------------------------------------------------------------

    #[test]
    fn gramian_eigenvalue_round_trip_values() {
        let iv = gramian_eigenvalue(0.5, 0.26, 0.05).unwrap();
        let width = 0.1 * (0.05f64 / 0.95).sqrt();
        assert!((width - 0.02294).abs() < 1e-5);
        assert!((iv.lower - 0.47706).abs() < 1e-5);
        assert!((iv.upper - 0.52294).abs() < 1e-5);
    }

    #[test]
    fn gramian_eigenvalue_zero_variance_collapses() {
        for epsilon in [0.0, 0.1, 0.5, 0.99] {
            let iv = gramian_eigenvalue(-1.1, 1.21, epsilon).unwrap();
            assert_eq!(iv.lower, -1.1);
            assert_eq!(iv.upper, -1.1);
        }
    }

    #[test]
    fn gramian_eigenvalue_negative_variance_clamped() {
        let iv = gramian_eigenvalue(0.5, 0.2, 0.1).unwrap();
        assert_eq!(iv.lower, 0.5);
        assert_eq!(iv.upper, 0.5);
    }

    #[test]
    fn gramian_eigenvalue_rejects_unit_epsilon() {
        let err = gramian_eigenvalue(0.5, 0.3, 1.0).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::Domain {
                method: Method::GramianEigenvalue,
                ..
            }
        ));
    }

    #[test]
    fn gramian_eigenvalue_rejects_negative_second_moment() {
        assert!(matches!(
            gramian_eigenvalue(0.1, -0.5, 0.1),
            Err(IntervalError::Validation {
                parameter: "mean_sq",
                ..
            })
        ));
    }

    // -----------------------------------------------------------------------
    // Dispatch, shifted gramian, intersection
    // -----------------------------------------------------------------------

    #[test]
    fn compute_dispatches_by_kind() {
        let m = Moments::new(0.5, 0.26);
        assert_eq!(
            compute(ObservableKind::Bounded, m, 0.05).unwrap().method,
            Method::Expectation
        );
        assert_eq!(
            compute(ObservableKind::Nonnegative, m, 0.05).unwrap().method,
            Method::GramianExpectation
        );
        assert_eq!(
            compute(ObservableKind::EigenstateTarget, m, 0.05)
                .unwrap()
                .method,
            Method::GramianEigenvalue
        );
    }

    #[test]
    fn shifted_gramian_brackets_mean() {
        let spectrum = SpectrumBounds::new(-2.0, 2.0).unwrap();
        let iv = gramian_expectation_shifted(Moments::new(-1.0, 1.2), 0.02, spectrum).unwrap();
        assert!(iv.lower <= -1.0 && -1.0 <= iv.upper);
        assert!(iv.lower >= -2.0 && iv.upper <= 2.0);
        assert!(iv.upper.is_finite());
    }

    #[test]
    fn shifted_gramian_has_its_own_method() {
        let spectrum = SpectrumBounds::new(-2.0, 2.0).unwrap();
        let iv = gramian_expectation_shifted(Moments::new(-1.0, 1.2), 0.02, spectrum).unwrap();
        assert_eq!(iv.method, Method::ShiftedGramianExpectation);
        assert_eq!(iv.method.to_string(), "shifted_gramian_expectation");
        let json = serde_json::to_string(&iv.method).unwrap();
        assert_eq!(json, r#""shifted_gramian_expectation""#);

        let err = gramian_expectation_shifted(Moments::first(-1.0), 0.02, spectrum).unwrap_err();
        assert!(matches!(
            err,
            IntervalError::Domain {
                method: Method::ShiftedGramianExpectation,
                ..
            }
        ));
    }

    #[test]
    fn shifted_gramian_mean_at_edge() {
        let spectrum = SpectrumBounds::new(-1.0, 1.0).unwrap();
        let iv = gramian_expectation_shifted(Moments::new(-1.0, 1.0), 0.1, spectrum).unwrap();
        assert_eq!(iv.lower, -1.0);
    }

    #[test]
    fn spectrum_bounds_validation() {
        assert!(SpectrumBounds::new(1.0, -1.0).is_err());
        assert!(SpectrumBounds::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn tightest_intersects() {
        let m = Moments::new(0.5, 0.26);
        let a = compute(ObservableKind::Bounded, m, 0.05).unwrap();
        let b = compute(ObservableKind::EigenstateTarget, m, 0.05).unwrap();
        let t = tightest(&[a, b]).unwrap();
        assert_eq!(t.method, Method::Intersection);
        assert_eq!(t.lower, a.lower.max(b.lower));
        assert_eq!(t.upper, a.upper.min(b.upper));
        assert_eq!(t.point_estimate, 0.5);
    }

    #[test]
    fn tightest_rejects_disjoint_and_empty() {
        let a = gramian_eigenvalue(0.0, 0.0, 0.1).unwrap();
        let b = gramian_eigenvalue(1.0, 1.0, 0.1).unwrap();
        assert!(matches!(
            tightest(&[a, b]),
            Err(IntervalError::Domain { .. })
        ));
        assert_eq!(
            tightest(&[]).unwrap_err(),
            IntervalError::InsufficientSamples { got: 0 }
        );
    }

    #[test]
    fn infinite_side_serializes_as_null() {
        let iv = gramian_expectation(1.0, 1.5, 0.01).unwrap();
        let json = serde_json::to_string(&iv).unwrap();
        assert!(json.contains("\"upper\":null"), "{json}");
        let back: RobustnessInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(back.upper, f64::INFINITY);
        assert_eq!(back.lower, iv.lower);
    }
}
