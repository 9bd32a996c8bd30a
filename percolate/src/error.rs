use thiserror::Error;

/// Errors reported by a clustering pass.
///
/// Every variant is detected before any bond decision is consumed, so a
/// failed call leaves the bond source untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    #[error("lattice side length must be at least 1")]
    EmptyLattice,

    #[error("bond probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("a {side}x{side} lattice is too large to index")]
    TooManySites { side: usize },

    #[error("{elements} elements exceed the u32 index space")]
    IndexOverflow { elements: usize },

    #[error("bond source can supply {available} decisions but the lattice needs {required}")]
    InsufficientBonds { required: usize, available: usize },

    #[error("failed to allocate storage for {elements} elements")]
    Allocation { elements: usize },
}

/// Check that `p` is a usable bond probability.
pub(crate) fn check_probability(p: f64) -> Result<f64, ClusterError> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ClusterError::InvalidProbability(p))
    }
}

/// Allocate a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, ClusterError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| ClusterError::Allocation { elements: len })?;
    v.resize(len, value);
    Ok(v)
}
