use rand::Rng;

use crate::bonds::{BernoulliBonds, BondSource};
use crate::error::{try_filled, ClusterError};
use crate::labels::densify;
use crate::lattice::Lattice;
use crate::unionfind::DisjointSet;

/// Cluster labeling of one sampled lattice.
///
/// `labels()[row * side + col]` is the cluster id of site `(row, col)`. Ids
/// are dense in `0..num_clusters()` and assigned in order of first
/// appearance in row-major order. They say nothing about cluster size or
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    side: usize,
    labels: Vec<u32>,
    num_clusters: u32,
}

impl Clustering {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn num_clusters(&self) -> u32 {
        self.num_clusters
    }

    /// Cluster id of site `(row, col)`.
    #[inline]
    pub fn label(&self, row: usize, col: usize) -> u32 {
        self.labels[row * self.side + col]
    }

    /// Whether sites `a` and `b` are joined by a path of open bonds.
    pub fn same_cluster(&self, a: u32, b: u32) -> bool {
        self.labels[a as usize] == self.labels[b as usize]
    }

    /// Label rows, top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, u32> {
        self.labels.chunks(self.side)
    }

    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }
}

/// Drives a [`DisjointSet`] over every candidate bond of a square lattice and
/// reduces the result to dense cluster labels.
///
/// Each call to [`LatticeClusterer::cluster`] is an independent pass with its
/// own union-find, so passes on separate threads need no coordination.
#[derive(Debug, Clone, Copy)]
pub struct LatticeClusterer {
    lattice: Lattice,
}

impl LatticeClusterer {
    pub fn new(side: usize) -> Result<Self, ClusterError> {
        Ok(Self {
            lattice: Lattice::new(side)?,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Run one clustering pass, pulling one decision per bond from `bonds`
    /// in canonical order.
    ///
    /// Storage is allocated and the source's capacity checked before any
    /// decision is drawn, so on error the source is left untouched.
    pub fn cluster<S: BondSource + ?Sized>(&self, bonds: &mut S) -> Result<Clustering, ClusterError> {
        let required = self.lattice.bond_count();
        if let Some(available) = bonds.remaining() {
            if available < required {
                return Err(ClusterError::InsufficientBonds {
                    required,
                    available,
                });
            }
        }

        let n = self.lattice.site_count();
        let mut ds = DisjointSet::try_new(n)?;
        let mut scratch = try_filled(n, 0u32)?;

        for bond in self.lattice.bonds() {
            if bonds.is_open(&bond) {
                ds.union(bond.a, bond.b);
            }
        }

        let mut labels = ds.into_roots();
        let num_clusters = densify(&mut labels, &mut scratch);

        Ok(Clustering {
            side: self.lattice.side(),
            labels,
            num_clusters,
        })
    }
}

/// Cluster an `side x side` lattice whose bonds are each open with
/// probability `p`, drawing one uniform value per bond from `rng`.
///
/// ```
/// use rand::SeedableRng;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let clustering = percolate::cluster_lattice(4, 1.0, &mut rng).unwrap();
/// assert_eq!(clustering.num_clusters(), 1);
/// ```
pub fn cluster_lattice<R: Rng + ?Sized>(
    side: usize,
    p: f64,
    rng: &mut R,
) -> Result<Clustering, ClusterError> {
    let clusterer = LatticeClusterer::new(side)?;
    let mut bonds = BernoulliBonds::new(p, rng)?;
    clusterer.cluster(&mut bonds)
}

/// Like [`cluster_lattice`], over a `Pcg32` stream seeded from `seed`.
pub fn cluster_seeded(side: usize, p: f64, seed: u64) -> Result<Clustering, ClusterError> {
    let clusterer = LatticeClusterer::new(side)?;
    let mut bonds = BernoulliBonds::seeded(p, seed)?;
    clusterer.cluster(&mut bonds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::BondPattern;
    use crate::labels::is_dense;

    fn run(side: usize, pattern: &mut BondPattern) -> Clustering {
        LatticeClusterer::new(side).unwrap().cluster(pattern).unwrap()
    }

    #[test]
    fn single_site_is_one_cluster() {
        let c = cluster_seeded(1, 0.5, 0).unwrap();
        assert_eq!(c.num_clusters(), 1);
        assert_eq!(c.labels(), &[0]);
    }

    #[test]
    fn zero_side_rejected() {
        assert_eq!(cluster_seeded(0, 0.5, 0), Err(ClusterError::EmptyLattice));
    }

    #[test]
    fn bad_probability_rejected() {
        assert_eq!(
            cluster_seeded(4, 2.0, 0),
            Err(ClusterError::InvalidProbability(2.0))
        );
    }

    #[test]
    fn all_closed_gives_singletons() {
        let lat = Lattice::new(4).unwrap();
        let c = run(4, &mut BondPattern::closed(&lat));
        assert_eq!(c.num_clusters(), 16);
        assert_eq!(c.labels(), (0..16).collect::<Vec<u32>>().as_slice());
    }

    #[test]
    fn all_open_gives_one_cluster() {
        let lat = Lattice::new(5).unwrap();
        let c = run(5, &mut BondPattern::open(&lat));
        assert_eq!(c.num_clusters(), 1);
        assert!(c.labels().iter().all(|&l| l == 0));
    }

    #[test]
    fn two_vertical_strips() {
        // Only vertical bonds open in columns 0 and 2 of a 3x3 lattice.
        let lat = Lattice::new(3).unwrap();
        let mut pat = BondPattern::from_fn(&lat, |b| {
            b.orientation == crate::lattice::Orientation::Vertical && b.a % 3 != 1
        });
        let c = run(3, &mut pat);

        #[rustfmt::skip]
        let expected = [
            0, 1, 2,
            0, 3, 2,
            0, 4, 2,
        ];
        assert_eq!(c.labels(), &expected);
        assert_eq!(c.num_clusters(), 5);
    }

    #[test]
    fn short_pattern_rejected_without_consuming() {
        let mut pat = BondPattern::new(vec![true; 5]);
        let r = LatticeClusterer::new(3).unwrap().cluster(&mut pat);
        assert_eq!(
            r,
            Err(ClusterError::InsufficientBonds {
                required: 12,
                available: 5
            })
        );
        assert_eq!(pat.remaining(), Some(5));
    }

    #[test]
    fn pattern_is_fully_consumed() {
        let lat = Lattice::new(6).unwrap();
        let mut pat = BondPattern::open(&lat);
        run(6, &mut pat);
        assert_eq!(pat.remaining(), Some(0));
    }

    #[test]
    fn accessors_agree() {
        let c = cluster_seeded(8, 0.5, 3).unwrap();
        assert_eq!(c.side(), 8);
        assert_eq!(c.labels().len(), 64);
        assert!(is_dense(c.labels(), c.num_clusters()));
        for (row, labels) in c.rows().enumerate() {
            assert_eq!(labels.len(), 8);
            for (col, &l) in labels.iter().enumerate() {
                assert_eq!(c.label(row, col), l);
            }
        }
        assert_eq!(c.labels()[0], 0);

        let owned = c.clone().into_labels();
        assert_eq!(owned.as_slice(), c.labels());
    }

    #[test]
    fn generic_rng_entry_point() {
        use rand::SeedableRng;
        let mut a = rand_pcg::Pcg32::seed_from_u64(5);
        let mut b = rand_pcg::Pcg32::seed_from_u64(5);
        let x = cluster_lattice(10, 0.5, &mut a).unwrap();
        let y = cluster_lattice(10, 0.5, &mut b).unwrap();
        assert_eq!(x, y);
        assert_eq!(x, cluster_seeded(10, 0.5, 5).unwrap());
    }
}
