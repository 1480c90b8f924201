#![deny(missing_docs)]
//! Hill climbing and simulated annealing metaheuristics over degree
//! preserving 2-switch moves, for the specx extremal spectral-radius
//! search engine.

pub mod kernel;

pub use kernel::{hill_climb, simulated_annealing, MetaParams, TrajectoryResult};
