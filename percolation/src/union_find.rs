/// Disjoint-set forest over provisional cluster labels.
///
/// Labels are handed out as `1, 2, 3, ...`; index 0 is reserved for closed
/// sites and never takes part in a union. Every class remembers its smallest
/// label, which is what [`LabelForest::root`] reports, so the canonical label
/// of a cluster does not depend on how the trees happen to be shaped.
#[derive(Clone, Debug)]
pub struct LabelForest {
    parent: Vec<usize>,
    rank: Vec<u8>,
    min_label: Vec<usize>,
}

impl LabelForest {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(labels: usize) -> Self {
        let mut forest = Self {
            parent: Vec::with_capacity(labels + 1),
            rank: Vec::with_capacity(labels + 1),
            min_label: Vec::with_capacity(labels + 1),
        };
        forest.reset();
        forest
    }

    /// Forgets every label, keeping the allocations.
    pub fn reset(&mut self) {
        self.parent.clear();
        self.rank.clear();
        self.min_label.clear();
        self.push(0);
    }

    /// Number of labels created since the last reset.
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new singleton class and returns its label.
    pub fn make_label(&mut self) -> usize {
        let label = self.parent.len();
        self.push(label);
        label
    }

    fn push(&mut self, label: usize) {
        self.parent.push(label);
        self.rank.push(0);
        self.min_label.push(label);
    }

    /// Returns the tree representative of `label`, compressing the path.
    pub fn find(&mut self, label: usize) -> usize {
        let mut repr = label;
        while self.parent[repr] != repr {
            repr = self.parent[repr];
        }

        let mut cur = label;
        while self.parent[cur] != repr {
            let next = self.parent[cur];
            self.parent[cur] = repr;
            cur = next;
        }
        repr
    }

    /// Smallest label of the class containing `label`.
    pub fn root(&mut self, label: usize) -> usize {
        let repr = self.find(label);
        self.min_label[repr]
    }

    /// Merges the classes of `a` and `b` and returns the root of the result.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return self.min_label[ra];
        }

        let (child, parent) = if self.rank[ra] < self.rank[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = parent;
        if self.rank[child] == self.rank[parent] {
            self.rank[parent] += 1;
        }

        let min = self.min_label[child].min(self.min_label[parent]);
        self.min_label[parent] = min;
        min
    }

    pub fn same_class(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

impl Default for LabelForest {
    fn default() -> Self {
        Self::new()
    }
}
