//! Confidence aggregation over repeated interval computations.
//!
//! Each trial's interval is itself a finite-shot estimate. The endpoint
//! sequences are summarised by sample mean and unbiased variance, and the
//! mean endpoints are widened outward by a Student-t margin so the final
//! interval holds at the requested confidence level.

use log::debug;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::bounds::RobustnessInterval;
use crate::config::{AggregatorConfig, Tail};
use crate::error::{IntervalError, Result};

/// Sample statistics of one endpoint sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EndpointStats {
    pub mean: f64,
    /// Unbiased (n - 1) sample variance.
    pub variance: f64,
    /// `sqrt(variance / n)`.
    pub std_error: f64,
}

/// Result of aggregating repeated trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedInterval {
    /// `mean(lowers) - t * se(lowers)`.
    pub lower: f64,
    /// Mean of the per-trial point estimates, not widened.
    pub point_estimate: f64,
    /// `mean(uppers) + t * se(uppers)`.
    pub upper: f64,
    pub confidence_level: f64,
    pub tail: Tail,
    pub n_trials: usize,
    pub critical_value: f64,
    pub lowers: EndpointStats,
    pub points: EndpointStats,
    pub uppers: EndpointStats,
}

/// Aggregate at `confidence_level` with a two-sided critical value.
pub fn aggregate(
    intervals: &[RobustnessInterval],
    confidence_level: f64,
) -> Result<AggregatedInterval> {
    aggregate_with(intervals, &AggregatorConfig::two_sided(confidence_level))
}

/// Aggregate with an explicit configuration.
pub fn aggregate_with(
    intervals: &[RobustnessInterval],
    config: &AggregatorConfig,
) -> Result<AggregatedInterval> {
    config.validate()?;
    let n = intervals.len();
    if n < 2 {
        return Err(IntervalError::InsufficientSamples { got: n });
    }

    let lower_seq: Vec<f64> = intervals.iter().map(|iv| iv.lower).collect();
    let point_seq: Vec<f64> = intervals.iter().map(|iv| iv.point_estimate).collect();
    let upper_seq: Vec<f64> = intervals.iter().map(|iv| iv.upper).collect();
    let lowers = endpoint_stats("lower endpoint", &lower_seq)?;
    let points = endpoint_stats("point estimate", &point_seq)?;
    let uppers = endpoint_stats("upper endpoint", &upper_seq)?;

    let t = critical_value(config, n - 1)?;
    let lower = lowers.mean - t * lowers.std_error;
    let upper = uppers.mean + t * uppers.std_error;

    debug!(
        "aggregated {n} trials at {} ({}): t={t:.4}, [{lower:.6}, {upper:.6}]",
        config.confidence_level, config.tail
    );

    Ok(AggregatedInterval {
        lower,
        point_estimate: points.mean,
        upper,
        confidence_level: config.confidence_level,
        tail: config.tail,
        n_trials: n,
        critical_value: t,
        lowers,
        points,
        uppers,
    })
}

/// Student-t critical value for `degrees_of_freedom` under `config`.
pub fn critical_value(config: &AggregatorConfig, degrees_of_freedom: usize) -> Result<f64> {
    config.validate()?;
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom as f64).map_err(|_| {
        IntervalError::validation(
            "degrees of freedom",
            degrees_of_freedom as f64,
            "a positive count",
        )
    })?;
    // Validated quantiles are >= 0.5; the clamp only absorbs rounding at 0.5.
    Ok(dist.inverse_cdf(config.quantile()).max(0.0))
}

/// Mean, unbiased variance and standard error of `values` (len >= 2).
///
/// A sequence containing infinities of one sign has that infinity as its
/// mean and zero spread.
fn endpoint_stats(name: &'static str, values: &[f64]) -> Result<EndpointStats> {
    if let Some(&bad) = values.iter().find(|v| v.is_nan()) {
        return Err(IntervalError::validation(name, bad, "a number"));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean.is_nan() {
        return Err(IntervalError::validation(
            name,
            mean,
            "infinities of a single sign",
        ));
    }
    if mean.is_infinite() {
        return Ok(EndpointStats {
            mean,
            variance: 0.0,
            std_error: 0.0,
        });
    }
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    Ok(EndpointStats {
        mean,
        variance,
        std_error: (variance / n).sqrt(),
    })
}
