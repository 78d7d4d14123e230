//! Error taxonomy for interval computation and aggregation.
//!
//! Every failure is surfaced synchronously to the caller. Nothing here is
//! retried or replaced by an approximate answer.

use thiserror::Error;

use crate::bounds::{Method, Side};

/// Errors returned by the robustness-interval calculator and aggregator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// A parameter is outside its admissible range (epsilon, fidelity,
    /// confidence level) or is not finite.
    #[error("invalid {parameter}: {value} (expected {expected})")]
    Validation {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A method-specific precondition does not hold.
    #[error("{method} method: {reason}")]
    Domain { method: Method, reason: String },

    /// The bounded-observable method cannot produce one side of the interval
    /// at this epsilon.
    #[error("{side} bound undefined: epsilon {epsilon} exceeds maximum {max_epsilon}")]
    OutOfRange {
        side: Side,
        epsilon: f64,
        max_epsilon: f64,
    },

    /// Fewer intervals than the aggregation needs.
    #[error("insufficient samples: need at least 2, got {got}")]
    InsufficientSamples { got: usize },

    /// The external measurement collaborator failed.
    #[error("measurement failed: {0}")]
    Measurement(String),
}

pub type Result<T> = std::result::Result<T, IntervalError>;

impl IntervalError {
    pub(crate) fn validation(parameter: &'static str, value: f64, expected: &'static str) -> Self {
        Self::Validation {
            parameter,
            value,
            expected,
        }
    }

    pub(crate) fn domain(method: Method, reason: impl Into<String>) -> Self {
        Self::Domain {
            method,
            reason: reason.into(),
        }
    }
}
