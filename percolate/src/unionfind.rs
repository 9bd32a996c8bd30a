use crate::error::{try_filled, ClusterError};

/// Union-find (disjoint-set) with full path compression and union by rank.
///
/// Elements are `u32` indices in `0..len`. The structure knows nothing about
/// lattice geometry.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create `n` singleton sets: every element is its own root with rank 0.
    ///
    /// Panics if `n` exceeds the `u32` index space or the arrays cannot be
    /// allocated. Use [`DisjointSet::try_new`] to get an error instead.
    pub fn new(n: usize) -> Self {
        match Self::try_new(n) {
            Ok(ds) => ds,
            Err(e) => panic!("DisjointSet::new({n}): {e}"),
        }
    }

    /// Create `n` singleton sets, reporting an oversized `n` or allocation
    /// failure as an error.
    pub fn try_new(n: usize) -> Result<Self, ClusterError> {
        if n > u32::MAX as usize {
            return Err(ClusterError::IndexOverflow { elements: n });
        }
        let mut parent = Vec::new();
        parent
            .try_reserve_exact(n)
            .map_err(|_| ClusterError::Allocation { elements: n })?;
        parent.extend(0..n as u32);
        let rank = try_filled(n, 0u8)?;
        Ok(Self { parent, rank })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of the set containing `x`.
    ///
    /// The first pass walks to the root, the second relinks every visited
    /// node directly to it.
    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = x;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing `x` and `y`. Returns `false` if they were
    /// already in the same set, in which case nothing changes.
    ///
    /// The lower-rank root is attached under the higher-rank root. On equal
    /// ranks the root of `x` becomes the parent and its rank grows by one.
    pub fn union(&mut self, x: u32, y: u32) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }

        let kx = self.rank[rx as usize];
        let ky = self.rank[ry as usize];
        if kx < ky {
            self.parent[rx as usize] = ry;
        } else {
            self.parent[ry as usize] = rx;
            if kx == ky {
                self.rank[rx as usize] += 1;
            }
        }
        true
    }

    /// Whether `x` and `y` are currently in the same set.
    pub fn same_set(&mut self, x: u32, y: u32) -> bool {
        self.find(x) == self.find(y)
    }

    /// Resolve every element to its root and hand back the parent array,
    /// which then maps each element directly to its root.
    pub fn into_roots(mut self) -> Vec<u32> {
        for x in 0..self.parent.len() as u32 {
            self.find(x);
        }
        self.parent
    }

    #[cfg(test)]
    fn rank_of(&self, x: u32) -> u8 {
        self.rank[x as usize]
    }

    #[cfg(test)]
    fn parent_of(&self, x: u32) -> u32 {
        self.parent[x as usize]
    }
}
