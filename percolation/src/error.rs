use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("lattice size must be positive")]
    InvalidSize,
    #[error("probability {0} is outside of [0, 1]")]
    InvalidProbability(f64),
    #[error("number of simulations must be positive")]
    InvalidTrialCount,
    #[error("probability list is empty")]
    EmptyProbabilities,
    #[error("curve has {p_values} probabilities sampled but {probabilities} estimates")]
    MisalignedCurve {
        p_values: usize,
        probabilities: usize,
    },
    #[error("finite-size fit needs at least two distinct sizes, got {0}")]
    NotEnoughSizes(usize),
    #[error("expected a {expected}x{expected} lattice, got {got}x{got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("cell ({row}, {col}) is outside of a {size}x{size} lattice")]
    CellOutOfBounds { row: usize, col: usize, size: usize },
    #[error(transparent)]
    InvalidPicture(#[from] PictureError),
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PictureError {
    #[error("picture has no rows")]
    Empty,
    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    UnexpectedChar { ch: char, row: usize, col: usize },
}

////////////////////////////////////////////////////////////////////////////////

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidSize);
    }
    Ok(())
}

pub(crate) fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidProbability(p));
    }
    Ok(())
}
