use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use crate::grid::Grid;

////////////////////////////////////////////////////////////////////////////////

/// Read-only summary of one trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrialResult {
    pub percolates: bool,
    pub largest_cluster_size: usize,
    /// Zero when the lattice does not percolate.
    pub percolating_cluster_size: usize,
}

////////////////////////////////////////////////////////////////////////////////

/// Root cluster label of every site, 0 for closed sites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterMap {
    labels: Grid<usize>,
}

impl ClusterMap {
    pub(crate) fn new(labels: Grid<usize>) -> Self {
        Self { labels }
    }

    pub fn size(&self) -> usize {
        self.labels.size()
    }

    pub fn label(&self, row: usize, col: usize) -> usize {
        *self.labels.get(row, col)
    }

    pub fn labels(&self) -> &Grid<usize> {
        &self.labels
    }

    /// Distinct nonzero labels.
    pub fn roots(&self) -> BTreeSet<usize> {
        self.labels.iter().copied().filter(|&l| l != 0).collect()
    }

    pub fn cluster_count(&self) -> usize {
        self.roots().len()
    }

    /// Number of sites per cluster label.
    pub fn cluster_sizes(&self) -> BTreeMap<usize, usize> {
        let mut sizes = BTreeMap::new();
        for &label in self.labels.iter().filter(|&&l| l != 0) {
            *sizes.entry(label).or_insert(0) += 1;
        }
        sizes
    }

    pub fn cluster_size(&self, label: usize) -> usize {
        if label == 0 {
            return 0;
        }
        self.labels.iter().filter(|&&l| l == label).count()
    }

    pub fn largest_cluster_size(&self) -> usize {
        self.cluster_sizes().values().copied().max().unwrap_or(0)
    }

    fn row_roots(&self, row: usize) -> BTreeSet<usize> {
        self.labels
            .row(row)
            .iter()
            .copied()
            .filter(|&l| l != 0)
            .collect()
    }

    /// Labels present in both the top and the bottom row.
    pub fn spanning_labels(&self) -> BTreeSet<usize> {
        if self.labels.is_empty() {
            return BTreeSet::new();
        }
        let top = self.row_roots(0);
        let bottom = self.row_roots(self.size() - 1);
        top.intersection(&bottom).copied().collect()
    }

    pub fn percolates(&self) -> bool {
        !self.spanning_labels().is_empty()
    }

    /// The spanning cluster as `(label, size)`.
    ///
    /// When several clusters span, the biggest one wins and equal sizes go to
    /// the smallest label.
    pub fn percolating_cluster(&self) -> Option<(usize, usize)> {
        let spanning = self.spanning_labels();
        if spanning.is_empty() {
            return None;
        }
        biggest_of(&spanning, &self.cluster_sizes())
    }

    pub fn percolating_cluster_size(&self) -> usize {
        self.percolating_cluster().map_or(0, |(_, size)| size)
    }

    /// All per-trial measurements from a single count of the cluster sizes.
    pub fn summary(&self) -> TrialResult {
        let spanning = self.spanning_labels();
        let sizes = self.cluster_sizes();
        TrialResult {
            percolates: !spanning.is_empty(),
            largest_cluster_size: sizes.values().copied().max().unwrap_or(0),
            percolating_cluster_size: biggest_of(&spanning, &sizes).map_or(0, |(_, size)| size),
        }
    }
}

fn biggest_of(
    labels: &BTreeSet<usize>,
    sizes: &BTreeMap<usize, usize>,
) -> Option<(usize, usize)> {
    labels
        .iter()
        .map(|&label| (label, sizes.get(&label).copied().unwrap_or(0)))
        .fold(None, |best, (label, size)| match best {
            Some((_, best_size)) if best_size >= size => best,
            _ => Some((label, size)),
        })
}

impl Display for ClusterMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .labels
            .iter()
            .max()
            .map_or(1, |max| max.to_string().len());
        for row in self.labels.rows() {
            let line = row
                .iter()
                .map(|l| format!("{l:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
