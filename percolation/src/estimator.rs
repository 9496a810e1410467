use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::{
    cluster_map::TrialResult,
    error::{check_probability, check_size, Error, Result},
    labeler::ClusterLabeler,
    lattice::Lattice,
    stats::{LinearFit, MeanStd},
};

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// Trials are spread over the rayon thread pool.
    #[default]
    Parallel,
    Sequential,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Trials per `(size, p)` pair.
    pub num_simulations: usize,
    /// Master seed; every trial generator is derived from it.
    pub seed: u64,
    pub execution: Execution,
}

impl EstimatorConfig {
    pub const DEFAULT_NUM_SIMULATIONS: usize = 30;
    pub const DEFAULT_SEED: u64 = 0x5eed_0f_9e_7c01a710;
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            num_simulations: Self::DEFAULT_NUM_SIMULATIONS,
            seed: Self::DEFAULT_SEED,
            execution: Execution::default(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Estimated percolation probability for each sampled `p`.
///
/// Always holds at least one sample, with `p_values` and `probabilities` of
/// equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct PercolationCurve {
    size: usize,
    p_values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl PercolationCurve {
    pub fn new(size: usize, p_values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        if p_values.is_empty() {
            return Err(Error::EmptyProbabilities);
        }
        if p_values.len() != probabilities.len() {
            return Err(Error::MisalignedCurve {
                p_values: p_values.len(),
                probabilities: probabilities.len(),
            });
        }
        Ok(Self {
            size,
            p_values,
            probabilities,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    /// Aligned with [`Self::p_values`].
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The sampled `p` whose percolation probability is nearest to 0.5.
    /// Ties go to the earlier sample. No interpolation is done.
    pub fn critical_probability(&self) -> f64 {
        let mut best = (self.p_values[0], (self.probabilities[0] - 0.5).abs());
        for (p, prob) in self.points().skip(1) {
            let dist = (prob - 0.5).abs();
            if dist < best.1 {
                best = (p, dist);
            }
        }
        best.0
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.p_values
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }
}

/// Normalised spanning cluster size `s / L^2` over the trials of one `(size, p)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterSizeStats {
    pub size: usize,
    pub p: f64,
    pub trials: usize,
    pub percolating_trials: usize,
    /// Over percolating trials only; `(0, 0)` when none percolated.
    pub conditional: MeanStd,
    /// Over all trials, non-percolating ones counted as zero.
    pub unconditional: MeanStd,
}

/// `p_c(L) = slope / L + intercept`, fitted against `1 / L`.
#[derive(Clone, Debug, PartialEq)]
pub struct FiniteSizeFit {
    pub points: Vec<(usize, f64)>,
    pub line: LinearFit,
}

impl FiniteSizeFit {
    /// Extrapolated threshold for an infinite lattice.
    pub fn critical_probability_limit(&self) -> f64 {
        self.line.intercept
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SizeSweep {
    pub size: usize,
    pub curve: PercolationCurve,
    pub critical_probability: f64,
    /// Aligned with the sweep's `p_values`.
    pub cluster_sizes: Vec<ClusterSizeStats>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    pub p_values: Vec<f64>,
    pub sizes: Vec<SizeSweep>,
    /// Present when at least two distinct sizes were swept.
    pub fit: Option<FiniteSizeFit>,
    pub elapsed: Duration,
}

impl SweepResult {
    pub fn critical_probabilities(&self) -> Vec<(usize, f64)> {
        self.sizes
            .iter()
            .map(|s| (s.size, s.critical_probability))
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Fits `p_c` against `1 / L`.
pub fn finite_size_fit(points: &[(usize, f64)]) -> Result<FiniteSizeFit> {
    for &(size, _) in points {
        check_size(size)?;
    }
    let xy = points
        .iter()
        .map(|&(size, pc)| (1.0 / size as f64, pc))
        .collect::<Vec<_>>();
    Ok(FiniteSizeFit {
        points: points.to_vec(),
        line: LinearFit::fit(&xy)?,
    })
}

////////////////////////////////////////////////////////////////////////////////

/// Coordinates of one `(size, p)` measurement. `index` is the position of `p`
/// in the sampled list.
#[derive(Clone, Copy)]
struct Point {
    size: usize,
    p: f64,
    index: usize,
}

impl Point {
    fn along(size: usize, p_values: &[f64]) -> impl Iterator<Item = Point> + '_ {
        p_values
            .iter()
            .enumerate()
            .map(move |(index, &p)| Point { size, p, index })
    }
}

#[derive(Clone, Copy)]
enum Purpose {
    Percolation = 1,
    ClusterSize = 2,
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Monte Carlo driver over independent random lattices.
///
/// Trial `i` of a `(size, p)` pair always draws from the same generator: a
/// ChaCha8 key derived from the master seed, `size`, `p`, the position of `p`
/// in the sampled list and the kind of measurement, on stream `i`. Results are therefore identical for parallel
/// and sequential execution and for any thread count.
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        if config.num_simulations == 0 {
            return Err(Error::InvalidTrialCount);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn trial_rng(&self, point: Point, purpose: Purpose, trial: usize) -> ChaCha8Rng {
        let key = [
            point.size as u64,
            point.p.to_bits(),
            point.index as u64,
            purpose as u64,
        ]
        .into_iter()
        .fold(self.config.seed, |acc, v| splitmix64(acc ^ v));
        let mut rng = ChaCha8Rng::seed_from_u64(key);
        rng.set_stream(trial as u64);
        rng
    }

    fn run_trial(
        &self,
        labeler: &mut ClusterLabeler,
        point: Point,
        purpose: Purpose,
        trial: usize,
    ) -> Result<TrialResult> {
        let mut rng = self.trial_rng(point, purpose, trial);
        let lattice = Lattice::random(point.size, point.p, &mut rng)?;
        Ok(labeler.label(&lattice)?.summary())
    }

    fn run_trials(&self, point: Point, purpose: Purpose) -> Result<Vec<TrialResult>> {
        check_size(point.size)?;
        check_probability(point.p)?;

        let n = self.config.num_simulations;
        match self.config.execution {
            Execution::Parallel => (0..n)
                .into_par_iter()
                .map_init(
                    || ClusterLabeler::new(point.size),
                    |labeler, trial| self.run_trial(labeler, point, purpose, trial),
                )
                .collect(),
            Execution::Sequential => {
                let mut labeler = ClusterLabeler::new(point.size);
                (0..n)
                    .map(|trial| self.run_trial(&mut labeler, point, purpose, trial))
                    .collect()
            }
        }
    }

    /// Fraction of trials whose lattice percolates.
    ///
    /// Draws the same trials as the first sample of a curve over `p`.
    pub fn percolation_probability(&self, size: usize, p: f64) -> Result<f64> {
        self.probability_at(Point { size, p, index: 0 })
    }

    fn probability_at(&self, point: Point) -> Result<f64> {
        let trials = self.run_trials(point, Purpose::Percolation)?;
        let hits = trials.iter().filter(|t| t.percolates).count();
        let prob = hits as f64 / trials.len() as f64;
        debug!(
            "L={} p={:.4}: {hits}/{} percolated",
            point.size,
            point.p,
            trials.len()
        );
        Ok(prob)
    }

    /// One probability per entry of `p_values`. Repeated values get
    /// independent trials.
    pub fn percolation_curve(&self, size: usize, p_values: &[f64]) -> Result<PercolationCurve> {
        if p_values.is_empty() {
            return Err(Error::EmptyProbabilities);
        }
        let probabilities = Point::along(size, p_values)
            .map(|point| self.probability_at(point))
            .collect::<Result<Vec<_>>>()?;
        PercolationCurve::new(size, p_values.to_vec(), probabilities)
    }

    /// Runs the curve for `p_values` and returns `p_c(size)` with it.
    pub fn critical_probability(
        &self,
        size: usize,
        p_values: &[f64],
    ) -> Result<(f64, PercolationCurve)> {
        let curve = self.percolation_curve(size, p_values)?;
        Ok((curve.critical_probability(), curve))
    }

    pub fn cluster_size_stats(&self, size: usize, p: f64) -> Result<ClusterSizeStats> {
        self.cluster_size_stats_at(Point { size, p, index: 0 })
    }

    fn cluster_size_stats_at(&self, point: Point) -> Result<ClusterSizeStats> {
        let Point { size, p, .. } = point;
        let trials = self.run_trials(point, Purpose::ClusterSize)?;
        let area = (size * size) as f64;

        let all = trials
            .iter()
            .map(|t| t.percolating_cluster_size as f64 / area)
            .collect::<Vec<_>>();
        let spanning = trials
            .iter()
            .zip(&all)
            .filter(|(t, _)| t.percolates)
            .map(|(_, &s)| s)
            .collect::<Vec<_>>();

        Ok(ClusterSizeStats {
            size,
            p,
            trials: trials.len(),
            percolating_trials: spanning.len(),
            conditional: MeanStd::from_samples(&spanning),
            unconditional: MeanStd::from_samples(&all),
        })
    }

    /// Curve, `p_c` and cluster sizes for every size, then the finite-size fit.
    pub fn sweep(&self, sizes: &[usize], p_values: &[f64]) -> Result<SweepResult> {
        if p_values.is_empty() {
            return Err(Error::EmptyProbabilities);
        }
        for &size in sizes {
            check_size(size)?;
        }
        for &p in p_values {
            check_probability(p)?;
        }

        let start = Instant::now();
        let mut result = Vec::with_capacity(sizes.len());
        for &size in sizes {
            let (critical_probability, curve) = self.critical_probability(size, p_values)?;
            info!("L={size}: p_c ~ {critical_probability:.4}");

            let cluster_sizes = Point::along(size, p_values)
                .map(|point| self.cluster_size_stats_at(point))
                .collect::<Result<Vec<_>>>()?;

            result.push(SizeSweep {
                size,
                curve,
                critical_probability,
                cluster_sizes,
            });
        }

        let points = result
            .iter()
            .map(|s| (s.size, s.critical_probability))
            .collect::<Vec<_>>();
        let fit = match finite_size_fit(&points) {
            Ok(fit) => {
                info!(
                    "p_c(inf) ~ {:.4} (slope {:.4})",
                    fit.critical_probability_limit(),
                    fit.line.slope
                );
                Some(fit)
            }
            Err(Error::NotEnoughSizes(_)) => None,
            Err(err) => return Err(err),
        };

        Ok(SweepResult {
            p_values: p_values.to_vec(),
            sizes: result,
            fit,
            elapsed: start.elapsed(),
        })
    }
}
