#![forbid(unsafe_code)]

use clap::Parser;
use percolation::{
    linspace, Estimator, EstimatorConfig, Execution, SweepResult, SQUARE_SITE_THRESHOLD,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////

/// Estimates the site percolation threshold of the square lattice.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Lattice sizes, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [32, 64, 128, 256])]
    sizes: Vec<usize>,

    /// First sampled site probability.
    #[arg(long, default_value_t = 0.55)]
    p_start: f64,

    /// Last sampled site probability.
    #[arg(long, default_value_t = 0.65)]
    p_stop: f64,

    /// Number of evenly spaced probabilities, endpoints included.
    #[arg(long, default_value_t = 11)]
    p_count: usize,

    /// Trials per (size, probability) pair.
    #[arg(long, default_value_t = EstimatorConfig::DEFAULT_NUM_SIMULATIONS)]
    trials: usize,

    #[arg(long, default_value_t = EstimatorConfig::DEFAULT_SEED)]
    seed: u64,

    /// Run trials on the current thread only.
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn config(&self) -> EstimatorConfig {
        EstimatorConfig {
            num_simulations: self.trials,
            seed: self.seed,
            execution: if self.sequential {
                Execution::Sequential
            } else {
                Execution::Parallel
            },
        }
    }

    fn p_values(&self) -> Vec<f64> {
        linspace(self.p_start, self.p_stop, self.p_count)
    }
}

////////////////////////////////////////////////////////////////////////////////

fn log_results(result: &SweepResult) {
    for sweep in &result.sizes {
        info!(size = sweep.size, p_c = sweep.critical_probability, "critical probability");
        for ((p, prob), stats) in sweep.curve.points().zip(&sweep.cluster_sizes) {
            info!(
                "L={:<4} p={:.4} P={:.3} s={:.6}±{:.6} ({} spanning) s_all={:.6}",
                sweep.size,
                p,
                prob,
                stats.conditional.mean,
                stats.conditional.std,
                stats.percolating_trials,
                stats.unconditional.mean,
            );
        }
    }

    match &result.fit {
        Some(fit) => {
            let limit = fit.critical_probability_limit();
            let rel_err = (limit - SQUARE_SITE_THRESHOLD).abs() / SQUARE_SITE_THRESHOLD;
            info!(
                p_c_inf = limit,
                slope = fit.line.slope,
                "extrapolated threshold, {:.4}% off {SQUARE_SITE_THRESHOLD}",
                rel_err * 100.0
            );
        }
        None => warn!("need two distinct sizes to extrapolate"),
    }
    info!("done in {:.2}s", result.elapsed.as_secs_f64());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let p_values = args.p_values();
    info!(
        "sweeping sizes {:?} over {} probabilities in [{}, {}], {} trials each",
        args.sizes,
        p_values.len(),
        args.p_start,
        args.p_stop,
        args.trials
    );

    let estimator = Estimator::new(args.config())?;
    let result = estimator.sweep(&args.sizes, &p_values)?;
    log_results(&result);

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
