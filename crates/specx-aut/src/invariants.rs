//! Graph invariants used to score and characterize search results:
//! spectral radius, triangle count, local clustering coefficient,
//! connectivity, and sampled average path length.

use nalgebra::{DMatrix, SymmetricEigen};
use rand::seq::SliceRandom;
use specx_core::rng::RngHandle;

fn build_adj(n: usize, edges: &[(u32, u32)]) -> Vec<std::collections::BTreeSet<usize>> {
    let mut adj = vec![std::collections::BTreeSet::new(); n];
    for &(u, v) in edges {
        if u == v {
            continue;
        }
        adj[u as usize].insert(v as usize);
        adj[v as usize].insert(u as usize);
    }
    adj
}

/// Largest eigenvalue of the dense symmetric 0/1 adjacency matrix.
pub fn spectral_radius(n: usize, edges: &[(u32, u32)]) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let mut a = DMatrix::<f64>::zeros(n, n);
    for &(u, v) in edges {
        a[(u as usize, v as usize)] = 1.0;
        a[(v as usize, u as usize)] = 1.0;
    }
    let eigen = SymmetricEigen::new(a);
    eigen
        .eigenvalues
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Number of triangles, computed by intersecting neighbor sets of each
/// edge's endpoints and dividing by 3 (each triangle is counted once per
/// participating edge).
pub fn count_triangles(n: usize, edges: &[(u32, u32)]) -> u64 {
    let adj = build_adj(n, edges);
    let mut total: u64 = 0;
    for u in 0..n {
        for &v in &adj[u] {
            if v > u {
                total += adj[u].intersection(&adj[v]).count() as u64;
            }
        }
    }
    total / 3
}

/// Average local clustering coefficient, averaged over vertices with
/// degree >= 2 (0.0 if none qualify).
pub fn avg_clustering(n: usize, edges: &[(u32, u32)]) -> f64 {
    let adj = build_adj(n, edges);
    let mut sum = 0.0;
    let mut count = 0u64;

    for v in 0..n {
        let deg = adj[v].len();
        if deg < 2 {
            continue;
        }
        count += 1;
        let neighbors: Vec<usize> = adj[v].iter().copied().collect();
        let mut links = 0u64;
        for i in 0..neighbors.len() {
            for j in (i + 1)..neighbors.len() {
                if adj[neighbors[i]].contains(&neighbors[j]) {
                    links += 1;
                }
            }
        }
        sum += (2.0 * links as f64) / (deg as f64 * (deg as f64 - 1.0));
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Whether the graph is connected (BFS from vertex 0). Trivially true for
/// `n <= 1`.
pub fn is_connected(n: usize, edges: &[(u32, u32)]) -> bool {
    specx_graph::is_connected(n, edges)
}

fn bfs_distances(n: usize, adj: &[std::collections::BTreeSet<usize>], src: usize) -> Vec<i64> {
    let mut dist = vec![-1i64; n];
    dist[src] = 0;
    let mut queue = std::collections::VecDeque::from([src]);
    while let Some(v) = queue.pop_front() {
        for &u in &adj[v] {
            if dist[u] == -1 {
                dist[u] = dist[v] + 1;
                queue.push_back(u);
            }
        }
    }
    dist
}

/// Average shortest-path length (APL). `None` for disconnected graphs.
/// For `n < 160` (or when `rng` is `None`), BFS runs from every vertex;
/// otherwise BFS runs from a uniform sample of `min(40, n)` sources.
pub fn avg_path_len(n: usize, edges: &[(u32, u32)], rng: Option<&mut RngHandle>) -> Option<f64> {
    if !is_connected(n, edges) {
        return None;
    }
    if n == 0 {
        return Some(0.0);
    }

    let adj = build_adj(n, edges);

    let sources: Vec<usize> = if n >= 160 {
        let sample_size = 40.min(n);
        match rng {
            Some(rng) => {
                let mut all: Vec<usize> = (0..n).collect();
                all.shuffle(rng.inner_mut());
                all.truncate(sample_size);
                all
            }
            None => (0..n).collect(),
        }
    } else {
        (0..n).collect()
    };

    let mut total: u64 = 0;
    let mut pairs: u64 = 0;
    for &s in &sources {
        let dist = bfs_distances(n, &adj, s);
        total += dist.iter().map(|&d| d as u64).sum::<u64>();
        pairs += (n - 1) as u64;
    }

    if pairs == 0 {
        Some(0.0)
    } else {
        Some(total as f64 / pairs as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k4_spectral_radius_is_three() {
        let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
        assert!((spectral_radius(4, &edges) - 3.0).abs() < 1e-9);
        assert_eq!(count_triangles(4, &edges), 4);
        assert!((avg_clustering(4, &edges) - 1.0).abs() < 1e-9);
        assert!((avg_path_len(4, &edges, None).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn path5_invariants() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4)];
        assert!((spectral_radius(5, &edges) - 1.7320508).abs() < 1e-6);
        assert_eq!(count_triangles(5, &edges), 0);
        assert!((avg_clustering(5, &edges) - 0.0).abs() < 1e-9);
        assert!((avg_path_len(5, &edges, None).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cycle5_invariants() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];
        assert!((spectral_radius(5, &edges) - 2.0).abs() < 1e-9);
        assert_eq!(count_triangles(5, &edges), 0);
        assert!((avg_path_len(5, &edges, None).unwrap() - 1.5).abs() < 1e-9);
        assert!(is_connected(5, &edges));
    }

    #[test]
    fn disconnected_graph_has_no_apl() {
        let edges = [(0, 1), (2, 3)];
        assert!(avg_path_len(4, &edges, None).is_none());
    }
}
