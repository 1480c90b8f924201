//! BFS connectivity helpers and the 2-switch-based connectivity enforcer.

use rand::seq::SliceRandom;
use specx_core::errors::{ErrorInfo, SpecxError};
use specx_core::rng::RngHandle;

use crate::edges::EdgeSet;

fn build_adj(n: usize, edges: &[(u32, u32)]) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); n];
    for &(u, v) in edges {
        adj[u as usize].push(v as usize);
        adj[v as usize].push(u as usize);
    }
    adj
}

/// Connected components of the graph, as lists of vertex indices, in BFS
/// discovery order starting from vertex 0.
pub fn components(n: usize, edges: &[(u32, u32)]) -> Vec<Vec<usize>> {
    let adj = build_adj(n, edges);
    let mut visited = vec![false; n];
    let mut comps = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut queue = std::collections::VecDeque::from([start]);
        visited[start] = true;
        let mut comp = vec![start];

        while let Some(x) = queue.pop_front() {
            for &y in &adj[x] {
                if !visited[y] {
                    visited[y] = true;
                    queue.push_back(y);
                    comp.push(y);
                }
            }
        }
        comps.push(comp);
    }
    comps
}

/// Whether the graph is connected. Trivially true for `n <= 1`.
pub fn is_connected(n: usize, edges: &[(u32, u32)]) -> bool {
    if n <= 1 {
        return true;
    }
    components(n, edges).len() == 1
}

/// Attempts to force connectivity via targeted 2-switches without changing
/// any vertex's degree.
///
/// Repeatedly finds the first two connected components, picks a random
/// intra-component edge from each, and 2-switches them together (placing
/// one endpoint from each side into each new edge), rejecting the draw if
/// it would create a multiedge. Fails with `LimitExceeded` if either
/// component has no internal edge (an isolated, zero-degree vertex makes
/// connectivity unreachable without changing degrees), or if the inner/outer
/// attempt budgets are exhausted.
pub fn enforce_connected(
    n: usize,
    edges: &EdgeSet,
    rng: &mut RngHandle,
    max_outer: u32,
    max_inner: u32,
) -> Result<EdgeSet, SpecxError> {
    let mut edge_set: std::collections::BTreeSet<(u32, u32)> = edges.edges().iter().copied().collect();

    let key = |u: u32, v: u32| if u < v { (u, v) } else { (v, u) };

    for _ in 0..max_outer {
        let list: Vec<(u32, u32)> = edge_set.iter().copied().collect();
        let comps = components(n, &list);
        if comps.len() <= 1 {
            return Ok(EdgeSet::normalize(n, edge_set));
        }

        let c1: std::collections::BTreeSet<usize> = comps[0].iter().copied().collect();
        let c2: std::collections::BTreeSet<usize> = comps[1].iter().copied().collect();

        let c1_edges: Vec<(u32, u32)> = list
            .iter()
            .copied()
            .filter(|&(u, v)| c1.contains(&(u as usize)) && c1.contains(&(v as usize)))
            .collect();
        let c2_edges: Vec<(u32, u32)> = list
            .iter()
            .copied()
            .filter(|&(u, v)| c2.contains(&(u as usize)) && c2.contains(&(v as usize)))
            .collect();

        if c1_edges.is_empty() || c2_edges.is_empty() {
            return Err(SpecxError::limit_exceeded(
                "connectivity_isolated_vertex",
                "connected_only: cannot connect (isolated vertices / zero-degree)",
            ));
        }

        let mut connected_this_round = false;
        for _ in 0..max_inner {
            let &(a, b) = c1_edges.choose(rng.inner_mut()).expect("non-empty");
            let &(c, d) = c2_edges.choose(rng.inner_mut()).expect("non-empty");

            if a != c && b != d && !edge_set.contains(&key(a, c)) && !edge_set.contains(&key(b, d)) {
                edge_set.remove(&key(a, b));
                edge_set.remove(&key(c, d));
                edge_set.insert(key(a, c));
                edge_set.insert(key(b, d));
                connected_this_round = true;
                break;
            }
            if a != d && b != c && !edge_set.contains(&key(a, d)) && !edge_set.contains(&key(b, c)) {
                edge_set.remove(&key(a, b));
                edge_set.remove(&key(c, d));
                edge_set.insert(key(a, d));
                edge_set.insert(key(b, c));
                connected_this_round = true;
                break;
            }
        }

        if !connected_this_round {
            continue;
        }
    }

    Err(SpecxError::LimitExceeded(
        ErrorInfo::new(
            "connectivity_enforcement_failed",
            "connected_only: failed to enforce connectivity within limits",
        )
        .with_context("max_outer", max_outer.to_string())
        .with_context("max_inner", max_inner.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_vertex_is_connected() {
        assert!(is_connected(1, &[]));
    }

    #[test]
    fn two_triangles_are_disconnected() {
        let edges = [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)];
        assert!(!is_connected(6, &edges));
        assert_eq!(components(6, &edges).len(), 2);
    }

    #[test]
    fn enforce_connected_merges_two_triangles() {
        let mut rng = RngHandle::from_seed(5);
        let es = EdgeSet::normalize(6, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let original_degrees = es.degree_sequence();

        let merged = enforce_connected(6, &es, &mut rng, 2000, 4000).unwrap();
        assert!(is_connected(6, merged.edges()));
        assert_eq!(merged.degree_sequence(), original_degrees);
    }

    #[test]
    fn enforce_connected_fails_on_isolated_vertex() {
        let mut rng = RngHandle::from_seed(0);
        let es = EdgeSet::normalize(4, [(0, 1), (1, 2)]);
        assert!(enforce_connected(4, &es, &mut rng, 50, 50).is_err());
    }
}
