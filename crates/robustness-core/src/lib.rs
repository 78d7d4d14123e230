//! # robustness-core
//!
//! **Guaranteed error bars for approximate quantum states.**
//!
//! A variational or noisy state ρ only approximates the target state σ. Given
//! moments of an observable measured on ρ and a bound `epsilon` on the
//! infidelity `1 - F(ρ, σ)`, this crate returns an interval that provably
//! contains the target-state expectation value (or eigenvalue).
//!
//! ## Quick Start
//!
//! ```
//! use robustness_core::{Moments, ObservableKind, compute};
//!
//! // VQE energy 0.5, <H²> = 0.26, fidelity with the ground state >= 0.95
//! let iv = compute(ObservableKind::EigenstateTarget, Moments::new(0.5, 0.26), 0.05).unwrap();
//! assert!(iv.lower < 0.5 && 0.5 < iv.upper);
//! ```
//!
//! ## Architecture
//!
//! MomentSource (external) → trials → bounds → aggregate → final interval
//!
//! - [`bounds`]: the three closed-form methods (expectation, Gramian
//!   expectation, Gramian eigenvalue), Pauli-sum and spectrum-shifted
//!   variants, and interval intersection.
//! - [`aggregate`]: Student-t widening of repeated shot-noise-limited trials.
//! - [`trials`]: the measurement collaborator seam and the trial loop.
//! - [`config`]: aggregation settings with JSON loading.

pub mod aggregate;
pub mod bounds;
pub mod config;
pub mod error;
pub mod trials;

pub use aggregate::{AggregatedInterval, EndpointStats, aggregate, aggregate_with, critical_value};
pub use bounds::pauli::{PauliSum, PauliTerm};
pub use bounds::{
    Method, Moments, ObservableKind, RobustnessInterval, Side, SpectrumBounds, compute,
    epsilon_from_fidelity, expectation, gramian_eigenvalue, gramian_expectation,
    gramian_expectation_shifted, tightest,
};
pub use config::{AggregatorConfig, Tail, load_config_from_path};
pub use error::{IntervalError, Result};
pub use trials::{MomentSource, ShotNoiseSource, run_trials};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
