//! Bond percolation on an L x L square lattice.
//!
//! Every horizontal and vertical bond is independently open with probability
//! `p`. [`LatticeClusterer`] unions the sites joined by open bonds in a
//! [`DisjointSet`] and reduces the forest to dense per-site cluster labels.

pub mod bonds;
pub mod clusterer;
pub mod config;
pub mod error;
pub mod labels;
pub mod lattice;
pub mod unionfind;

pub use bonds::{BernoulliBonds, BondPattern, BondSource};
pub use clusterer::{cluster_lattice, cluster_seeded, Clustering, LatticeClusterer};
pub use config::PercolationConfig;
pub use error::ClusterError;
pub use lattice::{Bond, Lattice, Orientation};
pub use unionfind::DisjointSet;
