//! Hill climbing and simulated annealing metaheuristics over 2-switch
//! moves on a fixed degree sequence.

use serde::{Deserialize, Serialize};
use specx_aut::{is_connected, spectral_radius};
use specx_core::rng::RngHandle;
use specx_core::types::Mode;
use specx_graph::edges::EdgeSet;
use specx_graph::rewire::two_switch;

/// Meta-parameters recorded alongside a metaheuristic run, for
/// reproducibility and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaParams {
    /// Seed the trajectory's RNG was constructed from.
    pub seed: Option<u64>,
    /// Search direction.
    pub mode: Mode,
    /// Whether disconnected candidates were rejected during the search.
    pub connected_only: bool,
    /// Starting temperature (simulated annealing only).
    pub t0: Option<f64>,
    /// Ending temperature (simulated annealing only).
    pub t_end: Option<f64>,
}

/// Result of a completed hill-climb or simulated-annealing trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// The trajectory's end-state edge set. For hill climbing this is also
    /// the best state seen, since every accepted move strictly improves;
    /// for simulated annealing this is the raw end state, not the best
    /// seen along the way.
    pub edges: EdgeSet,
    /// The end state's spectral radius (the objective value).
    pub spectral_radius: f64,
    /// Number of 2-switch attempts made.
    pub iterations: u32,
    /// Number of attempts that resulted in an accepted move.
    pub accepted_moves: u32,
    /// The meta-parameters this run was configured with.
    pub meta_params: MetaParams,
    /// Wall-clock time taken, in milliseconds.
    pub time_ms: u64,
}

fn propose_candidate(
    current: &EdgeSet,
    rng: &mut RngHandle,
    connected_only: bool,
) -> Option<(EdgeSet, f64)> {
    let n = current.n();
    let mut candidate_set: std::collections::BTreeSet<(u32, u32)> =
        current.edges().iter().copied().collect();
    if !two_switch(n, &mut candidate_set, rng) {
        return None;
    }
    let candidate = EdgeSet::normalize(n, candidate_set);

    if connected_only && !is_connected(n, candidate.edges()) {
        return None;
    }

    let sr = spectral_radius(n, candidate.edges());
    Some((candidate, sr))
}

/// Hill climbing (C9): starting from `start_edges`, repeatedly proposes a
/// 2-switch move and accepts it only if it strictly improves the objective
/// under `mode`. Runs exactly `iterations` proposal attempts regardless of
/// acceptance/rejection. Returns the end state, which for hill climbing is
/// also the best state seen (every accepted move is a strict improvement).
pub fn hill_climb(
    start_edges: &EdgeSet,
    seed: Option<u64>,
    iterations: u32,
    mode: Mode,
    connected_only: bool,
) -> TrajectoryResult {
    let started = std::time::Instant::now();
    let mut rng = RngHandle::from_seed_or_entropy(seed);

    let mut current = start_edges.clone();
    let mut current_sr = spectral_radius(current.n(), current.edges());
    let mut accepted = 0u32;

    for _ in 0..iterations {
        let Some((candidate, candidate_sr)) = propose_candidate(&current, &mut rng, connected_only) else {
            continue;
        };
        if mode.improves(candidate_sr, current_sr) {
            current = candidate;
            current_sr = candidate_sr;
            accepted += 1;
        }
    }

    TrajectoryResult {
        edges: current,
        spectral_radius: current_sr,
        iterations,
        accepted_moves: accepted,
        meta_params: MetaParams {
            seed,
            mode,
            connected_only,
            t0: None,
            t_end: None,
        },
        time_ms: started.elapsed().as_millis() as u64,
    }
}

/// Temperature at iteration `it` of `iterations` under the linear schedule
/// from `t0` down to `t_end`, clamped to a small positive floor so the
/// Metropolis exponent never divides by zero or a negative number.
fn temperature(it: u32, iterations: u32, t0: f64, t_end: f64) -> f64 {
    let frac = it as f64 / (iterations.saturating_sub(1)).max(1) as f64;
    let t = t0 + (t_end - t0) * frac;
    if t <= 0.0 {
        1e-12
    } else {
        t
    }
}

/// Simulated annealing (C9): same proposal skeleton as [`hill_climb`], but
/// a worsening move is accepted with Metropolis probability
/// `exp(-delta / T)` under a linearly decaying temperature schedule. Delta
/// is `candidate - current` in `min` mode and `current - candidate` in
/// `max` mode, so in both modes a negative delta is an improvement and is
/// always accepted. Returns the trajectory's end state as-is -- simulated
/// annealing does not track or return the best state seen.
pub fn simulated_annealing(
    start_edges: &EdgeSet,
    seed: Option<u64>,
    iterations: u32,
    t0: f64,
    t_end: f64,
    mode: Mode,
    connected_only: bool,
) -> TrajectoryResult {
    use rand::Rng;

    let started = std::time::Instant::now();
    let mut rng = RngHandle::from_seed_or_entropy(seed);

    let mut current = start_edges.clone();
    let mut current_sr = spectral_radius(current.n(), current.edges());
    let mut accepted = 0u32;

    for it in 0..iterations {
        let temp = temperature(it, iterations, t0, t_end);

        let Some((candidate, candidate_sr)) = propose_candidate(&current, &mut rng, connected_only) else {
            continue;
        };

        let delta = match mode {
            Mode::Min => candidate_sr - current_sr,
            Mode::Max => current_sr - candidate_sr,
        };

        let accept = if delta < 0.0 {
            true
        } else {
            rng.gen::<f64>() < (-delta / temp).exp()
        };

        if accept {
            current = candidate;
            current_sr = candidate_sr;
            accepted += 1;
        }
    }

    TrajectoryResult {
        edges: current,
        spectral_radius: current_sr,
        iterations,
        accepted_moves: accepted,
        meta_params: MetaParams {
            seed,
            mode,
            connected_only,
            t0: Some(t0),
            t_end: Some(t_end),
        },
        time_ms: started.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: usize) -> EdgeSet {
        let edges: Vec<(u32, u32)> = (0..n as u32).map(|i| (i, (i + 1) % n as u32)).collect();
        EdgeSet::normalize(n, edges)
    }

    #[test]
    fn hill_climb_is_monotone_min() {
        let start = cycle(10);
        let start_sr = spectral_radius(start.n(), start.edges());
        let result = hill_climb(&start, Some(1), 500, Mode::Min, false);
        assert!(result.spectral_radius <= start_sr + 1e-9);
        assert!(result.accepted_moves <= result.iterations);
    }

    #[test]
    fn hill_climb_is_monotone_max() {
        let start = cycle(10);
        let start_sr = spectral_radius(start.n(), start.edges());
        let result = hill_climb(&start, Some(2), 500, Mode::Max, false);
        assert!(result.spectral_radius >= start_sr - 1e-9);
    }

    #[test]
    fn sa_with_frozen_temperature_matches_hill_climb() {
        let start = cycle(10);
        let hc = hill_climb(&start, Some(42), 300, Mode::Min, false);
        let sa = simulated_annealing(&start, Some(42), 300, 1e-12, 1e-12, Mode::Min, false);
        assert!((hc.spectral_radius - sa.spectral_radius).abs() < 1e-6);
    }

    #[test]
    fn accepted_moves_never_exceed_iterations() {
        let start = cycle(6);
        let result = simulated_annealing(&start, Some(3), 1000, 1.0, 0.001, Mode::Min, false);
        assert!(result.accepted_moves <= result.iterations);
    }
}
