#![forbid(unsafe_code)]

//! Site percolation on a square lattice.
//!
//! Sites of an `L x L` lattice are open with probability `p`. Open sites that
//! touch up, down, left or right form clusters, found with a two-pass
//! Hoshen-Kopelman labeling. The lattice percolates when one cluster reaches
//! from the top row to the bottom row. [`Estimator`] repeats this over many
//! random lattices to estimate the percolation threshold and the spanning
//! cluster size.

mod cluster_map;
mod error;
mod estimator;
mod grid;
mod labeler;
mod lattice;
mod simulation;
mod stats;
mod union_find;

pub use cluster_map::{ClusterMap, TrialResult};
pub use error::{Error, PictureError, Result};
pub use estimator::{
    finite_size_fit, ClusterSizeStats, Estimator, EstimatorConfig, Execution, FiniteSizeFit,
    PercolationCurve, SizeSweep, SweepResult,
};
pub use grid::Grid;
pub use labeler::{label_clusters, ClusterLabeler};
pub use lattice::{Cell, Lattice};
pub use simulation::PercolationSimulation;
pub use stats::{LinearFit, MeanStd};
pub use union_find::LabelForest;

/// Site percolation threshold of the infinite square lattice.
pub const SQUARE_SITE_THRESHOLD: f64 = 0.592_746;

////////////////////////////////////////////////////////////////////////////////

/// `count` evenly spaced values from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values = (0..count).map(|i| start + step * i as f64).collect::<Vec<_>>();
            // keep the endpoint exact, p = 1.0 must stay a valid probability
            values[count - 1] = stop;
            values
        }
    }
}
