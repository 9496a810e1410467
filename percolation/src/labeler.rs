use crate::{
    cluster_map::ClusterMap,
    error::{Error, Result},
    grid::Grid,
    lattice::Lattice,
    union_find::LabelForest,
};

////////////////////////////////////////////////////////////////////////////////

/// Two-pass cluster labeling (Hoshen-Kopelman).
///
/// The first pass walks the lattice in raster order and gives each open site a
/// provisional label taken from its upper or left neighbour, recording in a
/// [`LabelForest`] that two labels meet whenever both neighbours are open. The
/// second pass replaces every provisional label with the smallest label of its
/// class.
///
/// Buffers are kept between runs, so one labeler can be reused for many
/// lattices of the same size.
pub struct ClusterLabeler {
    labels: Grid<usize>,
    forest: LabelForest,
}

impl ClusterLabeler {
    pub fn new(size: usize) -> Self {
        Self {
            labels: Grid::filled(size, 0),
            // checkerboard is the worst case
            forest: LabelForest::with_capacity((size * size + 1) / 2),
        }
    }

    pub fn size(&self) -> usize {
        self.labels.size()
    }

    /// Labels `lattice` and returns its cluster map.
    pub fn label(&mut self, lattice: &Lattice) -> Result<ClusterMap> {
        self.scan(lattice)?;
        Ok(self.resolve())
    }

    /// First pass only. Leaves provisional labels in [`Self::raw_labels`].
    pub fn scan(&mut self, lattice: &Lattice) -> Result<()> {
        if lattice.size() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                got: lattice.size(),
            });
        }
        self.scan_unchecked(lattice);
        Ok(())
    }

    /// Both passes. `lattice` must have the labeler's size.
    pub(crate) fn label_unchecked(&mut self, lattice: &Lattice) -> ClusterMap {
        self.scan_unchecked(lattice);
        self.resolve()
    }

    fn scan_unchecked(&mut self, lattice: &Lattice) {
        self.forest.reset();
        self.labels.fill(0);

        let size = lattice.size();
        for row in 0..size {
            for col in 0..size {
                if !lattice.is_open(row, col) {
                    continue;
                }

                let above = if row > 0 { *self.labels.get(row - 1, col) } else { 0 };
                let left = if col > 0 { *self.labels.get(row, col - 1) } else { 0 };

                let label = match (above, left) {
                    (0, 0) => self.forest.make_label(),
                    (label, 0) | (0, label) => label,
                    (above, left) => {
                        self.forest.union(above, left);
                        above.min(left)
                    }
                };
                self.labels.set(row, col, label);
            }
        }
    }

    /// Second pass: rewrites every label with its root and returns the map.
    ///
    /// Roots are fixed points of the forest, so resolving twice gives the same
    /// map.
    pub fn resolve(&mut self) -> ClusterMap {
        for label in self.labels.iter_mut().filter(|label| **label != 0) {
            *label = self.forest.root(*label);
        }
        ClusterMap::new(self.labels.clone())
    }

    pub fn raw_labels(&self) -> &Grid<usize> {
        &self.labels
    }

    /// Number of provisional labels handed out by the last scan.
    pub fn provisional_label_count(&self) -> usize {
        self.forest.len()
    }

    /// Root of a provisional label from the last scan.
    pub fn root(&mut self, label: usize) -> usize {
        self.forest.root(label)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Labels a single lattice.
pub fn label_clusters(lattice: &Lattice) -> ClusterMap {
    ClusterLabeler::new(lattice.size()).label_unchecked(lattice)
}
