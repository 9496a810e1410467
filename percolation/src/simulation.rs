use rand::Rng;

use crate::{
    cluster_map::{ClusterMap, TrialResult},
    error::{check_size, Error, Result},
    labeler::ClusterLabeler,
    lattice::Lattice,
};

////////////////////////////////////////////////////////////////////////////////

/// One lattice of a fixed size together with lazily computed cluster data.
///
/// The cluster map and the percolation flag are computed on first use and
/// dropped whenever a new lattice is installed.
pub struct PercolationSimulation {
    lattice: Lattice,
    labeler: ClusterLabeler,
    clusters: Option<ClusterMap>,
    percolates: Option<bool>,
}

impl PercolationSimulation {
    /// Creates a simulation holding an all-closed lattice.
    pub fn new(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            lattice: Lattice::closed(size)?,
            labeler: ClusterLabeler::new(size),
            clusters: None,
            percolates: None,
        })
    }

    pub fn size(&self) -> usize {
        self.lattice.size()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Drops cached cluster data and closes every site.
    pub fn reset(&mut self) {
        self.lattice.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.clusters = None;
        self.percolates = None;
    }

    /// Draws a fresh random lattice with site probability `p`.
    pub fn generate<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) -> Result<()> {
        let lattice = Lattice::random(self.size(), p, rng)?;
        self.invalidate();
        self.lattice = lattice;
        Ok(())
    }

    /// Installs a prepared lattice of the same size.
    pub fn set_lattice(&mut self, lattice: Lattice) -> Result<()> {
        if lattice.size() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                got: lattice.size(),
            });
        }
        self.invalidate();
        self.lattice = lattice;
        Ok(())
    }

    pub fn is_labeled(&self) -> bool {
        self.clusters.is_some()
    }

    pub fn clusters(&mut self) -> &ClusterMap {
        let Self {
            lattice,
            labeler,
            clusters,
            ..
        } = self;
        clusters.get_or_insert_with(|| labeler.label_unchecked(lattice))
    }

    pub fn percolates(&mut self) -> bool {
        if let Some(percolates) = self.percolates {
            return percolates;
        }
        let percolates = self.clusters().percolates();
        self.percolates = Some(percolates);
        percolates
    }

    pub fn largest_cluster_size(&mut self) -> usize {
        self.clusters().largest_cluster_size()
    }

    pub fn percolating_cluster_size(&mut self) -> usize {
        if !self.percolates() {
            return 0;
        }
        self.clusters().percolating_cluster_size()
    }

    pub fn trial_result(&mut self) -> TrialResult {
        let result = self.clusters().summary();
        self.percolates = Some(result.percolates);
        result
    }
}
