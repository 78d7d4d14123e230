pub mod aggregate;
pub mod interval;
pub mod pauli;
pub mod simulate;

use robustness_core::{IntervalError, ObservableKind, RobustnessInterval, epsilon_from_fidelity};

/// Parse an observable kind string into the enum.
///
/// Unknown names are an error; there is no default kind.
pub fn parse_kind(s: &str) -> Result<ObservableKind, String> {
    match s {
        "bounded" | "pauli" => Ok(ObservableKind::Bounded),
        "nonnegative" | "non_negative" | "positive" => Ok(ObservableKind::Nonnegative),
        "eigenstate" | "eigenstate_target" | "eigenvalue" => Ok(ObservableKind::EigenstateTarget),
        _ => Err(format!(
            "unknown observable kind '{s}' (expected bounded, nonnegative or eigenstate)"
        )),
    }
}

/// Resolve `--epsilon` / `--fidelity` into an infidelity bound.
pub fn resolve_epsilon(
    epsilon: Option<f64>,
    fidelity: Option<f64>,
) -> Result<f64, IntervalError> {
    match (epsilon, fidelity) {
        (Some(e), _) => Ok(e),
        (None, Some(f)) => epsilon_from_fidelity(f),
        (None, None) => Err(IntervalError::Validation {
            parameter: "epsilon",
            value: f64::NAN,
            expected: "--epsilon or --fidelity to be given",
        }),
    }
}

/// Print an error and exit with status 1.
pub fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

/// Format an interval side, rendering open sides as ±inf.
pub fn fmt_bound(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Print a table of intervals.
pub fn print_intervals(intervals: &[RobustnessInterval]) {
    println!(
        "  {:<20} {:>8} {:>12} {:>12} {:>12}",
        "Method", "epsilon", "Lower", "Estimate", "Upper"
    );
    println!("  {}", "-".repeat(68));
    for iv in intervals {
        println!(
            "  {:<20} {:>8.4} {:>12} {:>12.6} {:>12}",
            iv.method.to_string(),
            iv.epsilon,
            fmt_bound(iv.lower),
            iv.point_estimate,
            fmt_bound(iv.upper)
        );
    }
}

/// Write pretty JSON to `path`, or exit on failure.
pub fn write_json<T: serde::Serialize>(path: &str, value: &T) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(j) => j,
        Err(e) => fail("Failed to serialize output", e),
    };
    let len = json.len();
    if let Err(e) = std::fs::write(path, json) {
        fail(&format!("Failed to write {path}"), e);
    }
    log::debug!("wrote {len} bytes to {path}");
    println!("\nResults saved to: {path}");
}
