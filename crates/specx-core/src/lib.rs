#![deny(missing_docs)]
//! Core error, RNG and identity types shared across the specx extremal
//! spectral-radius search engine.

pub mod errors;
pub mod fingerprint;
pub mod rng;
pub mod types;

pub use errors::{ErrorInfo, SpecxError};
pub use fingerprint::{degree_fingerprint, DegreeFingerprint};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{AlgorithmTag, Mode, OBJECTIVE_SPECTRAL_RADIUS};
