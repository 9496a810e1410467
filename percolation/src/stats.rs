use crate::error::{Error, Result};

////////////////////////////////////////////////////////////////////////////////

/// Mean and population standard deviation of a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

impl MeanStd {
    /// An empty sample yields `(0, 0)`.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Least-squares line `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a first-degree polynomial through `(x, y)` points.
    /// Needs at least two distinct `x` values.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        let distinct = distinct_count(points);
        if distinct < 2 {
            return Err(Error::NotEnoughSizes(distinct));
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let sxx = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum::<f64>();
        let sxy = points
            .iter()
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum::<f64>();

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn distinct_count(points: &[(f64, f64)]) -> usize {
    let mut xs = points.iter().map(|(x, _)| *x).collect::<Vec<_>>();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.len()
}
