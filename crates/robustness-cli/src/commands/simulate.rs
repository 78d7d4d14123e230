//! `robustness simulate` — shot-noise trials of a two-outcome observable.

use std::time::Instant;

use robustness_core::{
    AggregatedInterval, AggregatorConfig, IntervalError, ObservableKind, RobustnessInterval,
    ShotNoiseSource, aggregate_with, run_trials,
};
use serde::Serialize;

pub struct SimulateCommandConfig<'a> {
    pub kind: &'a str,
    pub exact_mean: f64,
    pub shots: usize,
    pub trials: usize,
    pub epsilon: Option<f64>,
    pub fidelity: Option<f64>,
    pub confidence: f64,
    pub one_sided: bool,
    pub seed: Option<u64>,
    pub output_path: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    kind: ObservableKind,
    exact_mean: f64,
    shots: usize,
    epsilon: f64,
    trials: Vec<RobustnessInterval>,
    aggregate: AggregatedInterval,
}

pub fn run(cfg: SimulateCommandConfig<'_>) {
    let epsilon = super::resolve_epsilon(cfg.epsilon, cfg.fidelity)
        .unwrap_or_else(|e| super::fail("Invalid fidelity bound", e));
    let kind =
        super::parse_kind(cfg.kind).unwrap_or_else(|e| super::fail("Invalid --kind", e));
    let config = if cfg.one_sided {
        AggregatorConfig::one_sided(cfg.confidence)
    } else {
        AggregatorConfig::two_sided(cfg.confidence)
    };

    println!(
        "Simulating {} trial(s) of {} shots, exact mean {:.6}, kind {kind}...\n",
        cfg.trials, cfg.shots, cfg.exact_mean
    );

    let t0 = Instant::now();
    let report = simulate(kind, cfg.exact_mean, cfg.shots, cfg.trials, epsilon, &config, cfg.seed)
        .unwrap_or_else(|e| super::fail("Simulation failed", e));
    let elapsed = t0.elapsed().as_secs_f64();
    log::info!("{} trials finished in {elapsed:.3}s", report.trials.len());

    super::print_intervals(&report.trials);
    println!();
    super::aggregate::print_aggregate(&report.aggregate);
    let agg = &report.aggregate;
    let covered = agg.lower <= cfg.exact_mean && cfg.exact_mean <= agg.upper;
    println!(
        "\n  Exact mean {} the final interval [{:.1}s]",
        if covered { "lies inside" } else { "lies OUTSIDE" },
        elapsed
    );

    if let Some(path) = cfg.output_path {
        super::write_json(path, &report);
    }
}

fn simulate(
    kind: ObservableKind,
    exact_mean: f64,
    shots: usize,
    n_trials: usize,
    epsilon: f64,
    config: &AggregatorConfig,
    seed: Option<u64>,
) -> Result<SimulationReport, IntervalError> {
    let mut source = match kind {
        ObservableKind::Bounded => ShotNoiseSource::pauli(exact_mean, shots, seed)?,
        ObservableKind::Nonnegative | ObservableKind::EigenstateTarget => {
            ShotNoiseSource::projector(exact_mean, shots, seed)?
        }
    };
    let trials = run_trials(&mut source, kind, epsilon, n_trials)?;
    let aggregate = aggregate_with(&trials, config)?;
    Ok(SimulationReport {
        kind,
        exact_mean,
        shots,
        epsilon,
        trials,
        aggregate,
    })
}
