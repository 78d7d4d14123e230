//! `robustness aggregate` — confidence-widen a file of trial intervals.

use std::path::Path;

use robustness_core::{
    AggregatedInterval, AggregatorConfig, RobustnessInterval, Tail, aggregate_with,
    load_config_from_path,
};
use serde::Deserialize;

/// Accepted trial file layouts: a bare array, or the `simulate` output.
#[derive(Deserialize)]
#[serde(untagged)]
enum TrialsFile {
    Bare(Vec<RobustnessInterval>),
    Wrapped { trials: Vec<RobustnessInterval> },
}

impl TrialsFile {
    fn into_trials(self) -> Vec<RobustnessInterval> {
        match self {
            Self::Bare(t) | Self::Wrapped { trials: t } => t,
        }
    }
}

pub fn run(
    input: &str,
    confidence: Option<f64>,
    one_sided: bool,
    config_path: Option<&str>,
    output_path: Option<&str>,
) {
    let base = match config_path {
        Some(path) => load_config_from_path(Path::new(path))
            .unwrap_or_else(|e| super::fail(&format!("Failed to load config {path}"), e)),
        None => AggregatorConfig::default(),
    };
    let config = merge_config(base, confidence, one_sided);

    let trials =
        load_trials(Path::new(input)).unwrap_or_else(|e| super::fail("Failed to load trials", e));

    let result = aggregate_with(&trials, &config)
        .unwrap_or_else(|e| super::fail("Aggregation failed", e));

    print_aggregate(&result);

    if let Some(path) = output_path {
        super::write_json(path, &result);
    }
}

/// Apply command-line overrides on top of a file or default config.
fn merge_config(base: AggregatorConfig, confidence: Option<f64>, one_sided: bool) -> AggregatorConfig {
    AggregatorConfig {
        confidence_level: confidence.unwrap_or(base.confidence_level),
        tail: if one_sided { Tail::OneSided } else { base.tail },
    }
}

fn load_trials(path: &Path) -> std::io::Result<Vec<RobustnessInterval>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str::<TrialsFile>(&raw)
        .map(TrialsFile::into_trials)
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to parse trials JSON: {e}"),
            )
        })
}

/// Print the aggregated interval and its endpoint statistics.
pub fn print_aggregate(result: &AggregatedInterval) {
    println!(
        "Aggregated {} trials at {:.1}% confidence ({}), t = {:.4}\n",
        result.n_trials,
        result.confidence_level * 100.0,
        result.tail,
        result.critical_value
    );
    println!(
        "  {:<10} {:>12} {:>12} {:>12}",
        "Endpoint", "Mean", "Std err", "Final"
    );
    println!("  {}", "-".repeat(50));
    println!(
        "  {:<10} {:>12} {:>12.6} {:>12}",
        "lower",
        super::fmt_bound(result.lowers.mean),
        result.lowers.std_error,
        super::fmt_bound(result.lower)
    );
    println!(
        "  {:<10} {:>12} {:>12.6} {:>12}",
        "estimate",
        super::fmt_bound(result.points.mean),
        result.points.std_error,
        super::fmt_bound(result.point_estimate)
    );
    println!(
        "  {:<10} {:>12} {:>12.6} {:>12}",
        "upper",
        super::fmt_bound(result.uppers.mean),
        result.uppers.std_error,
        super::fmt_bound(result.upper)
    );
    println!(
        "\n  Final interval: [{}, {}]",
        super::fmt_bound(result.lower),
        super::fmt_bound(result.upper)
    );
}
