//! Bond decision sources.
//!
//! A clustering pass pulls exactly one open/closed decision per candidate
//! bond, in the lattice's canonical bond order. Anything implementing
//! [`BondSource`] can drive it: a Bernoulli source over a `rand` generator
//! for real simulations, or a pre-sampled [`BondPattern`] for reproducible
//! and hand-written configurations.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{check_probability, ClusterError};
use crate::lattice::{Bond, Lattice};

/// Supplier of bond open/closed decisions.
pub trait BondSource {
    /// Decide whether `bond` is open. Called exactly once per bond.
    fn is_open(&mut self, bond: &Bond) -> bool;

    /// How many more decisions this source can supply, or `None` if it is
    /// unbounded.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Independent Bernoulli(p) bond decisions drawn from a uniform generator.
///
/// Each decision consumes one uniform `[0, 1)` draw; the bond is open when
/// the draw is below `p`.
#[derive(Debug)]
pub struct BernoulliBonds<R> {
    p: f64,
    rng: R,
}

impl<R: Rng> BernoulliBonds<R> {
    pub fn new(p: f64, rng: R) -> Result<Self, ClusterError> {
        Ok(Self {
            p: check_probability(p)?,
            rng,
        })
    }
}

impl BernoulliBonds<Pcg32> {
    /// Bernoulli source over a `Pcg32` stream seeded from `seed`.
    pub fn seeded(p: f64, seed: u64) -> Result<Self, ClusterError> {
        Self::new(p, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> BondSource for BernoulliBonds<R> {
    #[inline]
    fn is_open(&mut self, _bond: &Bond) -> bool {
        self.rng.gen::<f64>() < self.p
    }
}

/// A fixed sequence of bond decisions in canonical bond order.
///
/// Used for enumerated test patterns and for bonds sampled ahead of the
/// union pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondPattern {
    open: Vec<bool>,
    pos: usize,
}

impl BondPattern {
    /// Pattern from explicit decisions, consumed front to back.
    pub fn new(open: Vec<bool>) -> Self {
        Self { open, pos: 0 }
    }

    /// Decide every bond of `lattice` with `f`, in canonical order.
    pub fn from_fn(lattice: &Lattice, mut f: impl FnMut(&Bond) -> bool) -> Self {
        Self::new(lattice.bonds().map(|b| f(&b)).collect())
    }

    /// Every bond closed.
    pub fn closed(lattice: &Lattice) -> Self {
        Self::new(vec![false; lattice.bond_count()])
    }

    /// Every bond open.
    pub fn open(lattice: &Lattice) -> Self {
        Self::new(vec![true; lattice.bond_count()])
    }

    /// Sample every bond of `lattice` from `rng` with probability `p`.
    pub fn sample<R: Rng>(lattice: &Lattice, p: f64, rng: &mut R) -> Result<Self, ClusterError> {
        let p = check_probability(p)?;
        Ok(Self::new(
            (0..lattice.bond_count())
                .map(|_| rng.gen::<f64>() < p)
                .collect(),
        ))
    }

    /// Sample every bond with each row on its own `Pcg32` stream, rows in
    /// parallel. The result depends only on `(lattice, p, seed)`.
    #[cfg(feature = "parallel")]
    pub fn sample_parallel(lattice: &Lattice, p: f64, seed: u64) -> Result<Self, ClusterError> {
        let p = check_probability(p)?;
        let open: Vec<bool> = (0..lattice.side())
            .into_par_iter()
            .flat_map_iter(|row| {
                let mut rng = row_stream(seed, row);
                (0..lattice.bonds_in_row(row)).map(move |_| rng.gen::<f64>() < p)
            })
            .collect();
        Ok(Self::new(open))
    }

    /// Serial equivalent of `sample_parallel`, producing identical decisions.
    pub fn sample_rows(lattice: &Lattice, p: f64, seed: u64) -> Result<Self, ClusterError> {
        let p = check_probability(p)?;
        let open = (0..lattice.side())
            .flat_map(|row| {
                let mut rng = row_stream(seed, row);
                (0..lattice.bonds_in_row(row)).map(move |_| rng.gen::<f64>() < p)
            })
            .collect();
        Ok(Self::new(open))
    }

    /// Total number of decisions in the pattern, consumed or not.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Number of open bonds in the pattern.
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }

    /// The decisions, in canonical order.
    pub fn as_slice(&self) -> &[bool] {
        &self.open
    }

    /// Rewind so the pattern can drive another pass.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

/// # Panics
///
/// `is_open` panics once every decision has been consumed. Check
/// [`BondSource::remaining`] first, as [`crate::LatticeClusterer`] does.
impl BondSource for BondPattern {
    fn is_open(&mut self, _bond: &Bond) -> bool {
        let open = self.open[self.pos];
        self.pos += 1;
        open
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.open.len() - self.pos)
    }
}

impl<S: BondSource + ?Sized> BondSource for &mut S {
    fn is_open(&mut self, bond: &Bond) -> bool {
        (**self).is_open(bond)
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Independent per-row generator: the seed picks the state, the row picks
/// the PCG stream.
fn row_stream(seed: u64, row: usize) -> Pcg32 {
    Pcg32::new(seed, row as u64)
}
