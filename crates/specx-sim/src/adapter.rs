//! Thin request/response contract between CLI commands (or any future
//! transport) and the graph/aut/meta/store crates. Mirrors the shapes the
//! original HTTP handlers returned, so a JSON transport built on top of
//! these structs would look the way the source's API responses did.

use serde::{Deserialize, Serialize};
use specx_aut::{avg_clustering, avg_path_len, count_triangles, is_connected, spectral_radius};
use specx_core::errors::SpecxError;
use specx_core::fingerprint::degree_fingerprint;
use specx_core::rng::RngHandle;
use specx_graph::edges::EdgeSet;
use specx_graph::graph6::{self, Graph6Orientation};
use specx_store::NewRun;

/// Structural metrics computed for a realized graph, independent of which
/// algorithm produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StructuralMetrics {
    /// Triangle count.
    pub triangles: u64,
    /// Average local clustering coefficient.
    pub clustering: f64,
    /// Average shortest-path length, `None` if disconnected.
    pub avg_path_len: Option<f64>,
    /// Whether the graph is connected.
    pub is_connected: bool,
}

/// Computes [`StructuralMetrics`] for `edges`, sampling APL sources when
/// `n >= 160` the same way the batch orchestrator does.
pub fn compute_structural(n: usize, edges: &[(u32, u32)], seed: Option<u64>) -> StructuralMetrics {
    let triangles = count_triangles(n, edges);
    let clustering = avg_clustering(n, edges);
    let mut rng = RngHandle::from_seed_or_entropy(seed);
    let apl = avg_path_len(n, edges, Some(&mut rng));
    let connected = is_connected(n, edges);
    StructuralMetrics {
        triangles,
        clustering,
        avg_path_len: apl,
        is_connected: connected,
    }
}

/// Everything needed to persist one realization/metaheuristic run, before
/// structural metrics and canonicalization have been attached.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The realized/optimized edge set.
    pub edges: EdgeSet,
    /// Wall-clock time the algorithm took, in milliseconds.
    pub time_ms: u64,
    /// Search direction used, if this was a metaheuristic run.
    pub objective_mode: String,
    /// Objective value (spectral radius) at the end of the run.
    pub objective_value: f64,
    /// Iteration budget consumed, for metaheuristic runs.
    pub iterations: Option<u32>,
    /// Accepted-move count, for metaheuristic runs.
    pub accepted_moves: Option<u32>,
    /// Meta-parameters, serialized as JSON, for metaheuristic runs.
    pub meta_params: Option<String>,
}

/// Builds a fully populated [`NewRun`] from a completed [`RunOutcome`],
/// attaching graph6 encoding, canonicalization (best-effort -- a missing
/// `labelg` binary degrades to the raw graph6 string rather than failing
/// the whole run) and structural metrics.
///
/// This is the Rust analogue of the source's `_build_result` /
/// `_save_run_from_result` / `_run_meta_common` trio -- they differ only
/// in which fields are pre-filled by the caller, so this single function
/// covers all three call sites.
pub fn build_new_run(
    algorithm: &str,
    degrees: &[u32],
    k: Option<i64>,
    seed: Option<u64>,
    outcome: RunOutcome,
    connected_only: bool,
) -> Result<NewRun, SpecxError> {
    let n = outcome.edges.n();
    let degrees_hash = degree_fingerprint(degrees).to_hex();

    let g6 = graph6::encode(&outcome.edges, Graph6Orientation::ColumnMajor)?;
    let canon_g6 = specx_aut::canonical_graph6(&g6).unwrap_or_else(|_| g6.clone());
    let g6_b64 = graph6::to_base64(&g6);
    let canon_b64 = graph6::to_base64(&canon_g6);

    let metrics = compute_structural(n, outcome.edges.edges(), seed);

    Ok(NewRun {
        n: n as i64,
        k,
        degrees: degrees.iter().map(|&d| d as i64).collect(),
        degrees_hash,
        algorithm: algorithm.to_string(),
        edges: outcome.edges.edges().iter().map(|&(u, v)| [u as i64, v as i64]).collect(),
        graph6_b64: g6_b64,
        canonical_g6_b64: canon_b64,
        graph6_decoded: Some(g6),
        canonical_g6_decoded: Some(canon_g6),
        time_ms: outcome.time_ms as i64,
        seed: seed.map(|s| s as i64),
        is_graphical: true,
        objective_name: "spectral_radius".to_string(),
        objective_mode: outcome.objective_mode,
        objective_value: Some(outcome.objective_value),
        spectral_radius: Some(outcome.objective_value),
        iterations: outcome.iterations.map(|v| v as i64),
        accepted_moves: outcome.accepted_moves.map(|v| v as i64),
        meta_params: outcome.meta_params,
        connected_only,
        triangles: Some(metrics.triangles as i64),
        avg_path_len: metrics.avg_path_len,
        clustering: Some(metrics.clustering),
        is_connected: Some(metrics.is_connected),
    })
}

/// Request payload for generating a degree sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDegreesRequest {
    /// Vertex count.
    pub n: usize,
    /// Target edge count (sum of degrees is `2k`).
    pub k: u64,
    /// Optional seed for determinism.
    pub seed: Option<u64>,
    /// Repair-retry budget for the generator.
    pub max_attempts: u32,
}

/// Response payload for a degree-sequence generation request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateDegreesResponse {
    /// Echoed vertex count.
    pub n: usize,
    /// Echoed target edge count.
    pub k: u64,
    /// Echoed seed.
    pub seed: Option<u64>,
    /// The generated degree sequence.
    pub degrees: Vec<u32>,
    /// Whether the generated sequence passed the Havel-Hakimi test.
    pub graphical: bool,
}

/// Runs the generator and graphicality check, mirroring
/// `api_generate`/`generate_fixed_sum` + `is_graphical_havel_hakimi`.
pub fn generate_degrees(req: &GenerateDegreesRequest) -> Result<GenerateDegreesResponse, SpecxError> {
    let mut rng = RngHandle::from_seed_or_entropy(req.seed);
    let degrees = specx_graph::degseq::generate_fixed_sum(req.n, req.k, &mut rng, req.max_attempts)?;
    let graphical = specx_graph::degseq::is_graphical(degrees.as_slice());
    Ok(GenerateDegreesResponse {
        n: req.n,
        k: req.k,
        seed: req.seed,
        degrees: degrees.into_vec(),
        graphical,
    })
}

/// Converts an already-persisted [`specx_store::RunRecord`] into its
/// display form (the analogue of `_run_to_json`).
pub fn run_summary_line(run: &specx_store::RunRecord) -> String {
    format!(
        "#{:<5} {:<16} n={:<4} objective={:<10.6} time_ms={}",
        run.id,
        run.algorithm,
        run.n,
        run.objective_value.unwrap_or(f64::NAN),
        run.time_ms
    )
}

/// Sanity-checks a spectral radius value against a freshly computed one,
/// used by commands that accept externally supplied edges.
pub fn verify_radius(n: usize, edges: &[(u32, u32)]) -> f64 {
    spectral_radius(n, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_new_run_round_trips_k4() {
        let edges = EdgeSet::normalize(4, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let outcome = RunOutcome {
            edges,
            time_ms: 5,
            objective_mode: "min".to_string(),
            objective_value: 3.0,
            iterations: None,
            accepted_moves: None,
            meta_params: None,
        };
        let run = build_new_run("greedy", &[3, 3, 3, 3], Some(6), Some(1), outcome, false).unwrap();
        assert_eq!(run.n, 4);
        assert_eq!(run.edges.len(), 6);
        assert!((run.spectral_radius.unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(run.is_connected, Some(true));
    }

    #[test]
    fn generate_degrees_matches_requested_sum() {
        let req = GenerateDegreesRequest {
            n: 10,
            k: 20,
            seed: Some(3),
            max_attempts: 2000,
        };
        let resp = generate_degrees(&req).unwrap();
        let sum: u32 = resp.degrees.iter().sum();
        assert_eq!(sum, 40);
    }
}
