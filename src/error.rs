use std::error;
use std::fmt;
use crate::index_space::Axis;




#[derive(Debug, Clone, PartialEq)]

/**
 * Error to represent an invalid problem configuration, grid, or
 * decomposition. All of these are detected before any residual is assembled.
 */
pub enum Error {
    InvalidDiffusivity(f64),
    InvalidGridSize(Axis, i64),
    InvalidDecomposition(Axis, usize, i64),
    InsufficientHalo(i64, i64),
    OwnedBoxOutsideGrid,
    UnknownLimiter(String),
    UnknownProblem(String),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidDiffusivity(eps) => write!(fmt, "eps={:.3} invalid ... eps > 0 required", eps),
            InvalidGridSize(axis, n) => write!(fmt, "grid size {} on axis {:?} is too small", n, axis),
            InvalidDecomposition(axis, b, n) => write!(fmt, "cannot split {} cells on axis {:?} into {} blocks", n, axis, b),
            InsufficientHalo(halo, reach) => write!(fmt, "halo width {} is less than the stencil reach {}", halo, reach),
            OwnedBoxOutsideGrid => write!(fmt, "owned index box is not contained in the grid"),
            UnknownLimiter(name) => write!(fmt, "unknown limiter '{}' (expected none|centered|vanleer)", name),
            UnknownProblem(name) => write!(fmt, "unknown problem '{}' (expected layer|glaze)", name),
        }
    }
}

impl error::Error for Error {}
