//! The degree-preserving 2-switch move.

use rand::seq::SliceRandom;
use specx_core::rng::RngHandle;

use crate::edges::EdgeSet;

/// Attempts one 2-switch on `edge_set` (mutated in place): picks two edges
/// `(a, b)` and `(c, d)` uniformly, rejects the draw unless all four
/// endpoints are distinct, then tries the `{(a, c), (b, d)}` pairing and
/// falls back to `{(a, d), (b, c)}`, accepting the first orientation whose
/// new edges are both absent from the current graph. Leaves the set
/// unchanged and returns `false` if no orientation applies.
///
/// Preserves the degree multiset exactly: the move only ever swaps two
/// edges for two edges spanning the same four vertices.
pub fn two_switch(n: usize, edge_set: &mut std::collections::BTreeSet<(u32, u32)>, rng: &mut RngHandle) -> bool {
    let _ = n;
    if edge_set.len() < 2 {
        return false;
    }
    let edges: Vec<(u32, u32)> = edge_set.iter().copied().collect();

    let &(a, b) = edges.choose(rng.inner_mut()).expect("non-empty edge list");
    let &(c, d) = edges.choose(rng.inner_mut()).expect("non-empty edge list");

    if [a, b, c, d].iter().collect::<std::collections::BTreeSet<_>>().len() != 4 {
        return false;
    }

    let key = |u: u32, v: u32| if u < v { (u, v) } else { (v, u) };
    let has = |edge_set: &std::collections::BTreeSet<(u32, u32)>, u: u32, v: u32| edge_set.contains(&key(u, v));

    if !has(edge_set, a, c) && !has(edge_set, b, d) {
        edge_set.remove(&key(a, b));
        edge_set.remove(&key(c, d));
        edge_set.insert(key(a, c));
        edge_set.insert(key(b, d));
        return true;
    }

    if !has(edge_set, a, d) && !has(edge_set, b, c) {
        edge_set.remove(&key(a, b));
        edge_set.remove(&key(c, d));
        edge_set.insert(key(a, d));
        edge_set.insert(key(b, c));
        return true;
    }

    false
}

/// Convenience wrapper over [`two_switch`] operating on an [`EdgeSet`]
/// directly, returning a new normalized `EdgeSet` (or the input unchanged
/// if the move was rejected).
pub fn two_switch_edge_set(edges: &EdgeSet, rng: &mut RngHandle) -> (EdgeSet, bool) {
    let n = edges.n();
    let mut set: std::collections::BTreeSet<(u32, u32)> = edges.edges().iter().copied().collect();
    let changed = two_switch(n, &mut set, rng);
    (EdgeSet::normalize(n, set), changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_degree_sequence_over_many_attempts() {
        let mut rng = RngHandle::from_seed(11);
        let mut edges: EdgeSet = EdgeSet::normalize(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
        let original_degrees = edges.degree_sequence();

        for _ in 0..1000 {
            let (next, _changed) = two_switch_edge_set(&edges, &mut rng);
            edges = next;
            assert_eq!(edges.degree_sequence(), original_degrees);
        }
    }

    #[test]
    fn rejects_when_fewer_than_two_edges() {
        let mut rng = RngHandle::from_seed(0);
        let mut set = std::collections::BTreeSet::new();
        set.insert((0u32, 1u32));
        assert!(!two_switch(2, &mut set, &mut rng));
    }
}
