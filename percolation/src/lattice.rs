use std::{
    collections::{HashSet, VecDeque},
    fmt::Display,
    str::FromStr,
};

use rand::{distributions::Bernoulli, prelude::Distribution, Rng};

use crate::{
    error::{check_probability, check_size, Error, PictureError, Result},
    grid::Grid,
};

/// `(row, col)` coordinates of a lattice site.
pub type Cell = (usize, usize);

const OPEN: char = '#';
const CLOSED: char = '.';

////////////////////////////////////////////////////////////////////////////////

/// Square lattice of open (`true`) and closed (`false`) sites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lattice {
    sites: Grid<bool>,
}

impl Lattice {
    /// Creates a lattice with every site closed.
    pub fn closed(size: usize) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            sites: Grid::filled(size, false),
        })
    }

    /// Creates a lattice where every site is open independently with
    /// probability `p`.
    ///
    /// # Arguments
    ///
    /// * `size` - side length, must be positive.
    /// * `p` - probability of any given site being open, in `[0, 1]`.
    /// * `rng` - source of randomness, consumed one draw per site.
    pub fn random<R: Rng + ?Sized>(size: usize, p: f64, rng: &mut R) -> Result<Self> {
        check_size(size)?;
        check_probability(p)?;
        let d = Bernoulli::new(p).map_err(|_| Error::InvalidProbability(p))?;
        let data = (0..size * size).map(|_| d.sample(rng)).collect();
        Ok(Self {
            sites: Grid::from_vec(size, data),
        })
    }

    /// Creates a lattice where exactly the given sites are open.
    pub fn from_open_cells<I>(size: usize, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut lattice = Self::closed(size)?;
        for (row, col) in cells {
            if row >= size || col >= size {
                return Err(Error::CellOutOfBounds { row, col, size });
            }
            lattice.set(row, col, true);
        }
        Ok(lattice)
    }

    /// Returns lattice side length.
    pub fn size(&self) -> usize {
        self.sites.size()
    }

    /// Returns whether the site is open.
    /// The caller must ensure that `row` and `col` are valid.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is out of bounds.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        *self.sites.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, open: bool) {
        self.sites.set(row, col, open);
    }

    /// Closes every site.
    pub fn clear(&mut self) {
        self.sites.fill(false);
    }

    pub fn open_count(&self) -> usize {
        self.sites.iter().filter(|&&open| open).count()
    }

    /// Open 4-neighbours of a site.
    pub fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = Cell> + '_ {
        let size = self.size() as isize;
        [(-1, 0), (0, -1), (0, 1), (1, 0)]
            .iter()
            .filter_map(move |(dr, dc)| {
                let r = row as isize + dr;
                let c = col as isize + dc;

                if r >= 0 && r < size && c >= 0 && c < size && self.is_open(r as usize, c as usize)
                {
                    return Some((r as usize, c as usize));
                }
                None
            })
    }

    /// Breadth-first search from the open sites of the top row.
    /// Returns `true` if it reaches the bottom row.
    pub fn spans(&self) -> bool {
        let last = self.size() - 1;
        let mut visited = HashSet::new();
        let mut queue = (0..self.size())
            .filter(|&col| self.is_open(0, col))
            .map(|col| (0, col))
            .collect::<VecDeque<_>>();
        visited.extend(queue.iter().copied());

        while let Some((row, col)) = queue.pop_front() {
            if row == last {
                return true;
            }

            for nb in self.neighbours(row, col) {
                if visited.insert(nb) {
                    queue.push_back(nb)
                }
            }
        }

        false
    }
}

impl Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.sites.rows() {
            for &open in row {
                write!(f, "{}", if open { OPEN } else { CLOSED })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the picture printed by `Display`: one line per row, `#` for an open
/// site and `.` for a closed one. Surrounding whitespace is ignored.
impl FromStr for Lattice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        if lines.is_empty() {
            return Err(PictureError::Empty.into());
        }

        let size = lines.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, line) in lines.iter().enumerate() {
            let got = line.chars().count();
            if got != size {
                return Err(PictureError::RaggedRow {
                    row,
                    expected: size,
                    got,
                }
                .into());
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    OPEN => data.push(true),
                    CLOSED => data.push(false),
                    ch => return Err(PictureError::UnexpectedChar { ch, row, col }.into()),
                }
            }
        }

        Ok(Self {
            sites: Grid::from_vec(size, data),
        })
    }
}
