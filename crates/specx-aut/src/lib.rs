#![deny(missing_docs)]
//! Graph invariants (spectral radius, triangles, clustering, APL,
//! connectivity) and nauty-based canonicalization for the specx engine.

pub mod canonical;
pub mod invariants;

pub use canonical::canonical_graph6;
pub use invariants::{avg_clustering, avg_path_len, count_triangles, is_connected, spectral_radius};
