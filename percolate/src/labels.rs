const UNSET: u32 = u32::MAX;

/// Rewrite per-site root indices into dense cluster ids, in place.
///
/// Ids are handed out in order of first appearance, so the first site always
/// gets id 0 and equal partitions always produce equal label arrays. Every
/// entry of `roots` must be a valid index into `scratch`, which is
/// overwritten. Returns the number of distinct clusters.
pub fn densify(roots: &mut [u32], scratch: &mut [u32]) -> u32 {
    scratch.fill(UNSET);
    let dense = scratch;
    let mut next = 0u32;
    for r in roots.iter_mut() {
        let slot = &mut dense[*r as usize];
        if *slot == UNSET {
            *slot = next;
            next += 1;
        }
        *r = *slot;
    }
    next
}

/// Whether `labels` is a dense labeling with `num_clusters` ids: every id is
/// below `num_clusters`, and every id in that range is used.
pub fn is_dense(labels: &[u32], num_clusters: u32) -> bool {
    let mut seen = vec![false; num_clusters as usize];
    for &l in labels {
        match seen.get_mut(l as usize) {
            Some(s) => *s = true,
            None => return false,
        }
    }
    seen.into_iter().all(|s| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn densify_owned(roots: &mut [u32]) -> u32 {
        let mut scratch = vec![0; roots.len()];
        densify(roots, &mut scratch)
    }

    #[test]
    fn first_seen_order() {
        let mut roots = vec![4, 4, 1, 4, 4, 5];
        let n = densify_owned(&mut roots);
        assert_eq!(n, 3);
        assert_eq!(roots, vec![0, 0, 1, 0, 0, 2]);
    }

    #[test]
    fn identity_roots_stay_distinct() {
        let mut roots: Vec<u32> = (0..6).collect();
        let n = densify_owned(&mut roots);
        assert_eq!(n, 6);
        assert_eq!(roots, (0..6).collect::<Vec<u32>>());
    }

    #[test]
    fn single_root() {
        let mut roots = vec![2; 5];
        assert_eq!(densify_owned(&mut roots), 1);
        assert!(roots.iter().all(|&l| l == 0));
    }

    #[test]
    fn empty_input() {
        let mut roots: Vec<u32> = Vec::new();
        assert_eq!(densify_owned(&mut roots), 0);
    }

    #[test]
    fn scratch_contents_ignored() {
        let mut roots = vec![1, 1, 0];
        let mut scratch = vec![0, 0, 0];
        assert_eq!(densify(&mut roots, &mut scratch), 2);
        assert_eq!(roots, vec![0, 0, 1]);
    }

    #[test]
    fn dense_check() {
        assert!(is_dense(&[0, 1, 1, 2], 3));
        assert!(!is_dense(&[0, 2, 2], 3));
        assert!(!is_dense(&[0, 3], 3));
        assert!(is_dense(&[], 0));
    }
}
