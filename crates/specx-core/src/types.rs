//! Small shared vocabulary types used across crate boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SpecxError;

/// Closed set of realization/search algorithms a [`Run`] can be tagged
/// with. Represented as a tagged enum rather than a free-form string so
/// that unknown tags are rejected at the boundary (CLI parsing, request
/// deserialization) instead of propagating into the store.
///
/// [`Run`]: https://docs.rs/specx-store (see `specx_store::schema::RunRecord`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmTag {
    /// Deterministic Havel-Hakimi greedy realization.
    Greedy,
    /// Randomized-greedy realization (shuffled top pool).
    Random,
    /// Exact backtracking realization.
    ExactRealization,
    /// Hill climbing over 2-switch moves.
    Hc,
    /// Simulated annealing over 2-switch moves.
    Sa,
}

impl AlgorithmTag {
    /// Returns the canonical lowercase string form, matching the
    /// serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmTag::Greedy => "greedy",
            AlgorithmTag::Random => "random",
            AlgorithmTag::ExactRealization => "exact_realization",
            AlgorithmTag::Hc => "hc",
            AlgorithmTag::Sa => "sa",
        }
    }
}

impl fmt::Display for AlgorithmTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmTag {
    type Err = SpecxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(AlgorithmTag::Greedy),
            "random" => Ok(AlgorithmTag::Random),
            "exact" | "exact_realization" => Ok(AlgorithmTag::ExactRealization),
            "hc" => Ok(AlgorithmTag::Hc),
            "sa" => Ok(AlgorithmTag::Sa),
            other => Err(SpecxError::validation(
                "unknown_algorithm",
                format!("unknown algorithm tag '{other}'"),
            )),
        }
    }
}

/// Search direction for the spectral-radius objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Search for the minimum spectral radius.
    Min,
    /// Search for the maximum spectral radius.
    Max,
}

impl Mode {
    /// Returns the canonical lowercase string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Min => "min",
            Mode::Max => "max",
        }
    }

    /// Returns `true` if `candidate` is a strict improvement over
    /// `current` under this mode.
    pub fn improves(&self, candidate: f64, current: f64) -> bool {
        match self {
            Mode::Min => candidate < current,
            Mode::Max => candidate > current,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SpecxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Mode::Min),
            "max" => Ok(Mode::Max),
            other => Err(SpecxError::validation(
                "unknown_mode",
                format!("unknown mode '{other}', expected 'min' or 'max'"),
            )),
        }
    }
}

/// The objective a [`Run`](specx_store equivalent) is scored on. Always
/// `spectral_radius` today; kept as a named constant rather than a bare
/// string literal scattered across crates.
pub const OBJECTIVE_SPECTRAL_RADIUS: &str = "spectral_radius";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_tag_round_trips() {
        for tag in [
            AlgorithmTag::Greedy,
            AlgorithmTag::Random,
            AlgorithmTag::ExactRealization,
            AlgorithmTag::Hc,
            AlgorithmTag::Sa,
        ] {
            assert_eq!(tag.as_str().parse::<AlgorithmTag>().unwrap(), tag);
        }
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        assert!("bogus".parse::<AlgorithmTag>().is_err());
    }

    #[test]
    fn mode_improves() {
        assert!(Mode::Min.improves(1.0, 2.0));
        assert!(!Mode::Min.improves(2.0, 1.0));
        assert!(Mode::Max.improves(2.0, 1.0));
        assert!(!Mode::Max.improves(1.0, 2.0));
    }
}
