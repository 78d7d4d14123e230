//! CLI for robustness-interval — guaranteed error bars for approximate quantum states.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "robustness")]
#[command(about = "robustness — guaranteed error bars for approximate quantum states")]
#[command(version = robustness_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one robustness interval from measured moments and a fidelity bound
    Interval {
        /// Comma-separated observable kinds the caller vouches for:
        /// bounded (-1<=A<=1), nonnegative (A>=0), eigenstate (target is an eigenstate).
        /// With several kinds the intersection of their intervals is reported.
        #[arg(long, default_value = "eigenstate")]
        kinds: String,

        /// First moment <A> on the approximate state
        #[arg(long, allow_hyphen_values = true)]
        mean: f64,

        /// Second moment <A^2> (required for nonnegative and eigenstate)
        #[arg(long)]
        mean_sq: Option<f64>,

        /// Infidelity bound 1 - F
        #[arg(long, conflicts_with = "fidelity")]
        epsilon: Option<f64>,

        /// Fidelity lower bound F
        #[arg(long)]
        fidelity: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Bound a Pauli-sum observable from per-term means (JSON file)
    Pauli {
        /// Path to a JSON PauliSum: {"constant": c0, "terms": [{"label", "coefficient", "mean"}]}
        #[arg(long)]
        input: String,

        /// Infidelity bound 1 - F
        #[arg(long, conflicts_with = "fidelity")]
        epsilon: Option<f64>,

        /// Fidelity lower bound F
        #[arg(long)]
        fidelity: Option<f64>,

        /// Measured <H^2>; enables the spectrum-shifted Gramian bound
        #[arg(long)]
        mean_sq: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Aggregate repeated trial intervals into a confidence-widened interval
    Aggregate {
        /// JSON file with trial intervals (array, or object with a "trials" array)
        #[arg(long)]
        input: String,

        /// Confidence level in (0, 1); overrides the config file
        #[arg(long)]
        confidence: Option<f64>,

        /// Use a one-sided critical value; overrides the config file
        #[arg(long)]
        one_sided: bool,

        /// Aggregator config JSON ({"confidence_level", "tail"})
        #[arg(long)]
        config: Option<String>,

        /// Write the aggregated result as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Run shot-noise trials of a two-outcome observable and aggregate them
    Simulate {
        /// Observable kind: bounded (±1 outcomes), nonnegative or eigenstate (0/1 outcomes)
        #[arg(long, default_value = "bounded", value_parser = ["bounded", "nonnegative", "eigenstate"])]
        kind: String,

        /// Exact mean of the observable on the approximate state
        #[arg(long, allow_hyphen_values = true)]
        exact_mean: f64,

        /// Shots per moment estimate
        #[arg(long, default_value = "1000")]
        shots: usize,

        /// Number of repeated trials
        #[arg(long, default_value = "20")]
        trials: usize,

        /// Infidelity bound 1 - F
        #[arg(long, conflicts_with = "fidelity")]
        epsilon: Option<f64>,

        /// Fidelity lower bound F
        #[arg(long)]
        fidelity: Option<f64>,

        /// Confidence level in (0, 1)
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Use a one-sided critical value
        #[arg(long)]
        one_sided: bool,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Write trials and aggregate as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Interval {
            kinds,
            mean,
            mean_sq,
            epsilon,
            fidelity,
            json,
        } => commands::interval::run(commands::interval::IntervalCommandConfig {
            kinds: &kinds,
            mean,
            mean_sq,
            epsilon,
            fidelity,
            json,
        }),
        Commands::Pauli {
            input,
            epsilon,
            fidelity,
            mean_sq,
            json,
        } => commands::pauli::run(&input, epsilon, fidelity, mean_sq, json),
        Commands::Aggregate {
            input,
            confidence,
            one_sided,
            config,
            output,
        } => commands::aggregate::run(
            &input,
            confidence,
            one_sided,
            config.as_deref(),
            output.as_deref(),
        ),
        Commands::Simulate {
            kind,
            exact_mean,
            shots,
            trials,
            epsilon,
            fidelity,
            confidence,
            one_sided,
            seed,
            output,
        } => commands::simulate::run(commands::simulate::SimulateCommandConfig {
            kind: &kind,
            exact_mean,
            shots,
            trials,
            epsilon,
            fidelity,
            confidence,
            one_sided,
            seed,
            output_path: output.as_deref(),
        }),
    }
}
