//! Repeated noisy trials feeding the aggregator.
//!
//! The circuit, observable, variational parameters and execution backend all
//! live behind [`MomentSource`]. This module only drives it: each trial asks
//! the source for fresh moment estimates and turns them into one interval.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::{self, Moments, ObservableKind, RobustnessInterval};
use crate::error::{IntervalError, Result};

/// External measurement collaborator.
///
/// Every call returns an independent estimate, exact or shot-noise limited,
/// depending on the implementor's execution configuration.
pub trait MomentSource {
    /// Estimate `<A>` on the approximate state.
    fn first_moment(&mut self) -> Result<f64>;

    /// Estimate `<A²>` on the approximate state.
    fn second_moment(&mut self) -> Result<f64>;

    /// Estimate the moments a method for `kind` needs.
    fn moments_for(&mut self, kind: ObservableKind) -> Result<Moments> {
        let mean = self.first_moment()?;
        if kind.needs_second_moment() {
            Ok(Moments::new(mean, self.second_moment()?))
        } else {
            Ok(Moments::first(mean))
        }
    }
}

/// Run `n_trials` independent trials and compute one interval per trial.
pub fn run_trials<S: MomentSource + ?Sized>(
    source: &mut S,
    kind: ObservableKind,
    epsilon: f64,
    n_trials: usize,
) -> Result<Vec<RobustnessInterval>> {
    let mut intervals = Vec::with_capacity(n_trials);
    for trial in 0..n_trials {
        let moments = source.moments_for(kind)?;
        let interval = bounds::compute(kind, moments, epsilon)?;
        intervals.push(interval);
        if (trial + 1) % 10 == 0 {
            info!("completed {}/{n_trials} trials", trial + 1);
        }
    }
    Ok(intervals)
}

// ---------------------------------------------------------------------------
// Shot-noise source
// ---------------------------------------------------------------------------

/// Finite-shot sampler of a two-outcome observable with known exact mean.
///
/// Each moment estimate draws `shots` fresh outcomes, so repeated calls show
/// the same shot noise a hardware run would.
#[derive(Debug)]
pub struct ShotNoiseSource {
    low: f64,
    high: f64,
    p_high: f64,
    shots: usize,
    rng: StdRng,
}

impl ShotNoiseSource {
    /// Outcomes `-1` / `+1`, e.g. a Pauli string. `exact_mean` in [-1, 1].
    pub fn pauli(exact_mean: f64, shots: usize, seed: Option<u64>) -> Result<Self> {
        Self::new(-1.0, 1.0, exact_mean, shots, seed)
    }

    /// Outcomes `0` / `1`, e.g. a projector. `exact_mean` in [0, 1].
    pub fn projector(exact_mean: f64, shots: usize, seed: Option<u64>) -> Result<Self> {
        Self::new(0.0, 1.0, exact_mean, shots, seed)
    }

    /// Two outcomes `low < high` with `exact_mean` between them.
    pub fn new(
        low: f64,
        high: f64,
        exact_mean: f64,
        shots: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(IntervalError::validation(
                "outcome range",
                high - low,
                "finite outcomes with low < high",
            ));
        }
        if !exact_mean.is_finite() || exact_mean < low || exact_mean > high {
            return Err(IntervalError::validation(
                "exact mean",
                exact_mean,
                "a value between the two outcomes",
            ));
        }
        if shots == 0 {
            return Err(IntervalError::validation(
                "shots",
                0.0,
                "at least one shot",
            ));
        }
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            low,
            high,
            p_high: (exact_mean - low) / (high - low),
            shots,
            rng,
        })
    }

    pub fn exact_mean(&self) -> f64 {
        self.low + (self.high - self.low) * self.p_high
    }

    pub fn exact_second_moment(&self) -> f64 {
        self.low * self.low * (1.0 - self.p_high) + self.high * self.high * self.p_high
    }

    /// Number of `high` outcomes in one batch of shots.
    fn sample_high_count(&mut self) -> usize {
        let p = self.p_high;
        (0..self.shots).filter(|_| self.rng.random_bool(p)).count()
    }
}

impl MomentSource for ShotNoiseSource {
    fn first_moment(&mut self) -> Result<f64> {
        let highs = self.sample_high_count() as f64;
        let lows = self.shots as f64 - highs;
        Ok((lows * self.low + highs * self.high) / self.shots as f64)
    }

    fn second_moment(&mut self) -> Result<f64> {
        let highs = self.sample_high_count() as f64;
        let lows = self.shots as f64 - highs;
        Ok((lows * self.low * self.low + highs * self.high * self.high) / self.shots as f64)
    }
}
