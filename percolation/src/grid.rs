/// Square row-major matrix. Row 0 is the top of the lattice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a `size`x`size` grid with every cell set to `value`.
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub(crate) fn from_vec(size: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { size, data }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells, `size * size`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not less than the grid size.
    pub fn get(&self, row: usize, col: usize) -> &T {
        assert!(col < self.size, "column {col} out of bounds");
        &self.data[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(col < self.size, "column {col} out of bounds");
        self.data[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks panics on zero, an empty grid simply has no rows
        self.data.chunks(self.size.max(1))
    }

    /// Cells in raster order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}
