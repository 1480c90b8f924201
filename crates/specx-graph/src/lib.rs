#![deny(missing_docs)]
//! Degree sequences, graph6 codec, and degree-preserving graph construction
//! and rewiring for the specx extremal spectral-radius search engine.

pub mod connectivity;
pub mod degseq;
pub mod edges;
pub mod graph6;
pub mod realize;
pub mod rewire;

pub use connectivity::{components, enforce_connected, is_connected};
pub use degseq::{generate_fixed_sum, is_graphical, DegreeSequence};
pub use edges::EdgeSet;
pub use graph6::Graph6Orientation;
pub use rewire::{two_switch, two_switch_edge_set};
