//! Canonical simple-graph edge sets.

use serde::{Deserialize, Serialize};
use specx_core::errors::{ErrorInfo, SpecxError};

/// An unordered simple-graph edge set on `n` vertices, always held in
/// canonical form: loops dropped, each pair oriented `u < v`, deduplicated,
/// sorted ascending by `(u, v)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSet {
    n: usize,
    edges: Vec<(u32, u32)>,
}

impl EdgeSet {
    /// Builds a canonical [`EdgeSet`] from an arbitrary list of pairs.
    ///
    /// Drops loops, orients each pair `u < v`, drops endpoints outside
    /// `[0, n)`, deduplicates, and sorts ascending. This is a total
    /// function: it never fails, silently discarding malformed input.
    pub fn normalize(n: usize, raw: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        for (mut u, mut v) in raw {
            if u == v {
                continue;
            }
            if u > v {
                std::mem::swap(&mut u, &mut v);
            }
            if (v as usize) >= n {
                continue;
            }
            seen.insert((u, v));
        }
        EdgeSet {
            n,
            edges: seen.into_iter().collect(),
        }
    }

    /// Wraps an already-canonical edge list without re-normalizing,
    /// validating only that every endpoint is in range and oriented.
    pub fn from_canonical(n: usize, edges: Vec<(u32, u32)>) -> Result<Self, SpecxError> {
        for &(u, v) in &edges {
            if u >= v {
                return Err(SpecxError::validation(
                    "edge_not_canonical",
                    format!("edge ({u}, {v}) is not oriented u < v"),
                ));
            }
            if (v as usize) >= n {
                return Err(SpecxError::Validation(
                    ErrorInfo::new("edge_out_of_range", format!("edge ({u}, {v}) exceeds n={n}"))
                        .with_context("n", n.to_string()),
                ));
            }
        }
        Ok(EdgeSet { n, edges })
    }

    /// Number of vertices this edge set is defined over.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The canonical, sorted, deduplicated edge list.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the edge set is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Degree sequence induced by this edge set, in vertex-index order.
    pub fn degree_sequence(&self) -> Vec<u32> {
        let mut deg = vec![0u32; self.n];
        for &(u, v) in &self.edges {
            deg[u as usize] += 1;
            deg[v as usize] += 1;
        }
        deg
    }

    /// Consumes the edge set, returning its raw `(n, edges)` parts.
    pub fn into_parts(self) -> (usize, Vec<(u32, u32)>) {
        (self.n, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_loops_and_dedupes() {
        let es = EdgeSet::normalize(4, [(0, 0), (1, 2), (2, 1), (2, 1), (3, 10)]);
        assert_eq!(es.edges(), &[(1, 2)]);
    }

    #[test]
    fn sorts_ascending() {
        let es = EdgeSet::normalize(4, [(2, 3), (0, 1), (1, 2)]);
        assert_eq!(es.edges(), &[(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn degree_sequence_matches_edges() {
        let es = EdgeSet::normalize(4, [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(es.degree_sequence(), vec![3, 3, 3, 3]);
    }
}
