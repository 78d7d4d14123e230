//! `robustness pauli` — bound a Pauli-sum observable from per-term means.

use std::path::Path;

use robustness_core::{
    IntervalError, Moments, PauliSum, RobustnessInterval, gramian_expectation_shifted, tightest,
};

pub fn run(
    input: &str,
    epsilon: Option<f64>,
    fidelity: Option<f64>,
    mean_sq: Option<f64>,
    json: bool,
) {
    let epsilon = super::resolve_epsilon(epsilon, fidelity)
        .unwrap_or_else(|e| super::fail("Invalid fidelity bound", e));
    let hamiltonian =
        load_pauli_sum(Path::new(input)).unwrap_or_else(|e| super::fail("Failed to load", e));

    let intervals = pauli_intervals(&hamiltonian, mean_sq, epsilon)
        .unwrap_or_else(|e| super::fail("Interval computation failed", e));

    if json {
        match serde_json::to_string_pretty(&intervals) {
            Ok(j) => println!("{j}"),
            Err(e) => super::fail("Failed to serialize output", e),
        }
        return;
    }

    let spectrum = hamiltonian.spectrum_bounds();
    println!(
        "Pauli sum: {} term(s), <H> = {:.6}, spectrum within [{:.6}, {:.6}]\n",
        hamiltonian.terms.len(),
        hamiltonian.mean(),
        spectrum.lower,
        spectrum.upper
    );
    super::print_intervals(&intervals);
}

fn load_pauli_sum(path: &Path) -> std::io::Result<PauliSum> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str::<PauliSum>(&raw).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse Pauli sum JSON: {e}"),
        )
    })
}

/// Term-wise expectation bound, plus the shifted Gramian bound and the
/// intersection when `<H²>` is known.
fn pauli_intervals(
    hamiltonian: &PauliSum,
    mean_sq: Option<f64>,
    epsilon: f64,
) -> Result<Vec<RobustnessInterval>, IntervalError> {
    let mut intervals = vec![hamiltonian.expectation_interval(epsilon)?];
    if let Some(sq) = mean_sq {
        let moments = Moments::new(hamiltonian.mean(), sq);
        intervals.push(gramian_expectation_shifted(
            moments,
            epsilon,
            hamiltonian.spectrum_bounds(),
        )?);
        intervals.push(tightest(&intervals)?);
    }
    Ok(intervals)
}
