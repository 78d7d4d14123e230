//! `robustness interval` — one interval from measured moments.

use robustness_core::{
    IntervalError, Moments, ObservableKind, RobustnessInterval, compute, tightest,
};
use serde::Serialize;

pub struct IntervalCommandConfig<'a> {
    pub kinds: &'a str,
    pub mean: f64,
    pub mean_sq: Option<f64>,
    pub epsilon: Option<f64>,
    pub fidelity: Option<f64>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct IntervalReport {
    intervals: Vec<RobustnessInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tightest: Option<RobustnessInterval>,
}

pub fn run(cfg: IntervalCommandConfig<'_>) {
    let epsilon = super::resolve_epsilon(cfg.epsilon, cfg.fidelity)
        .unwrap_or_else(|e| super::fail("Invalid fidelity bound", e));
    let kinds = parse_kinds(cfg.kinds).unwrap_or_else(|e| super::fail("Invalid --kinds", e));
    let moments = Moments {
        mean: cfg.mean,
        mean_sq: cfg.mean_sq,
    };

    let report = build_report(&kinds, moments, epsilon)
        .unwrap_or_else(|e| super::fail("Interval computation failed", e));

    if cfg.json {
        match serde_json::to_string_pretty(&report) {
            Ok(j) => println!("{j}"),
            Err(e) => super::fail("Failed to serialize output", e),
        }
        return;
    }

    println!("Robustness interval (epsilon = {epsilon:.6}, fidelity >= {:.6})\n", 1.0 - epsilon);
    super::print_intervals(&report.intervals);
    if let Some(best) = &report.tightest {
        println!(
            "\n  Intersection: [{}, {}] (width {})",
            super::fmt_bound(best.lower),
            super::fmt_bound(best.upper),
            super::fmt_bound(best.width())
        );
    }
}

/// Parse a comma-separated list of kinds, dropping duplicates.
fn parse_kinds(list: &str) -> Result<Vec<ObservableKind>, String> {
    let mut kinds = Vec::new();
    for name in list.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let kind = super::parse_kind(name)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err("no observable kind given".to_string());
    }
    Ok(kinds)
}

fn build_report(
    kinds: &[ObservableKind],
    moments: Moments,
    epsilon: f64,
) -> Result<IntervalReport, IntervalError> {
    let intervals = kinds
        .iter()
        .map(|&kind| compute(kind, moments, epsilon))
        .collect::<Result<Vec<_>, _>>()?;
    let tightest = if intervals.len() > 1 {
        Some(tightest(&intervals)?)
    } else {
        None
    };
    Ok(IntervalReport {
        intervals,
        tightest,
    })
}
