//! Autosearch job orchestration (C12): the batch loop that generates a
//! graphical degree sequence, runs the configured baseline algorithms,
//! picks the best baseline as a metaheuristic starting point, runs hill
//! climbing and simulated annealing, persists every run, and attempts a
//! discovery detection -- once per batch iteration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use specx_aut::spectral_radius;
use specx_core::errors::SpecxError;
use specx_core::fingerprint::degree_fingerprint;
use specx_core::rng::RngHandle;
use specx_core::types::Mode;
use specx_graph::connectivity::is_connected as edges_connected;
use specx_graph::degseq::{generate_fixed_sum, is_graphical};
use specx_graph::edges::EdgeSet;
use specx_graph::realize::{greedy, random_greedy};
use specx_meta::{hill_climb, simulated_annealing};
use specx_store::discovery::{try_create_discovery, AnomalyThresholds};
use specx_store::schema::{self, insert_run};
use rusqlite::Connection;

use crate::adapter::{build_new_run, RunOutcome};
use crate::job::realize_backtracking_with_timeout;

/// Parameters for one autosearch batch, mirroring the source's
/// `AutoSearchJob.params` dict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParams {
    /// Vertex count.
    pub n: usize,
    /// Target edge count.
    pub k: u64,
    /// Number of degree-sequence samples to process.
    pub batch: u32,
    /// Metaheuristic iteration budget, per run.
    pub iters: u32,
    /// Search direction.
    pub mode: Mode,
    /// Base seed; sample `i` uses `seed + i` when set.
    pub seed: Option<u64>,

    /// Discovery-detector numerical tolerance.
    pub eps: f64,
    /// Discovery-detector triangle ratio.
    pub tri_ratio: f64,
    /// Discovery-detector APL ratio.
    pub apl_ratio: f64,
    /// Discovery-detector clustering ratio.
    pub cl_ratio: f64,

    /// Simulated annealing starting temperature.
    pub t0: f64,
    /// Simulated annealing ending temperature.
    pub t_end: f64,

    /// Whether to run the greedy baseline.
    pub do_greedy: bool,
    /// Whether to run the random-greedy baseline.
    pub do_random: bool,
    /// Number of random-greedy repetitions per sample.
    pub random_reps: u32,
    /// Whether to attempt exact (backtracking) realization.
    pub do_exact: bool,
    /// Largest `n` for which exact realization is attempted.
    pub exact_n_max: usize,
    /// Wall-clock budget for exact realization, in seconds.
    pub exact_timeout_s: f64,

    /// Reject disconnected candidates throughout the batch.
    pub connected_only: bool,
    /// Degree-generation retry budget per sample.
    pub max_deg_attempts: u32,
}

impl Default for JobParams {
    fn default() -> Self {
        JobParams {
            n: 30,
            k: 120,
            batch: 10,
            iters: 6000,
            mode: Mode::Min,
            seed: None,
            eps: 1e-6,
            tri_ratio: 0.5,
            apl_ratio: 1.25,
            cl_ratio: 0.7,
            t0: 1.0,
            t_end: 0.001,
            do_greedy: true,
            do_random: true,
            random_reps: 2,
            do_exact: true,
            exact_n_max: 20,
            exact_timeout_s: 2.0,
            connected_only: false,
            max_deg_attempts: 20,
        }
    }
}

/// Outcome of one batch sample: the progress message to record, and --
/// when a degree sequence was actually produced -- its fingerprint, so
/// the caller can run the discovery detector against it.
struct SampleOutcome {
    message: String,
    degrees_hash: Option<String>,
}

/// Runs exactly one sample of the batch loop: generate a graphical degree
/// sequence, run the configured baselines, run both metaheuristics from
/// the best baseline, and persist every run. Mirrors the source's
/// `job.last_message` assignments inside the loop body, minus the
/// discovery step, which needs a `&mut Connection` and so is run
/// separately by the caller.
fn run_one_sample(conn: &Connection, params: &JobParams, sample_seed: Option<u64>) -> Result<SampleOutcome, SpecxError> {
    let mut deg: Option<Vec<u32>> = None;
    for attempt in 0..params.max_deg_attempts {
        let draw_seed = sample_seed.map(|s| s.wrapping_add(attempt as u64));
        let mut rng = RngHandle::from_seed_or_entropy(draw_seed);
        let candidate = generate_fixed_sum(params.n, params.k, &mut rng, 8000)?;
        if is_graphical(candidate.as_slice()) {
            deg = Some(candidate.into_vec());
            break;
        }
    }

    let Some(degrees) = deg else {
        return Ok(SampleOutcome {
            message: format!("skip: couldn't generate graphical deg (seed={sample_seed:?})"),
            degrees_hash: None,
        });
    };

    let degrees_hash = degree_fingerprint(&degrees).to_hex();
    let mode_str = params.mode.as_str();

    let mut baseline_edges: Option<EdgeSet> = None;
    let mut baseline_sr: Option<f64> = None;

    let mut consider = |edges: EdgeSet, mode: Mode| {
        if params.connected_only && !edges_connected(edges.n(), edges.edges()) {
            return;
        }
        let sr = spectral_radius(edges.n(), edges.edges());
        let better = match baseline_sr {
            None => true,
            Some(current) => mode.improves(sr, current),
        };
        if better {
            baseline_sr = Some(sr);
            baseline_edges = Some(edges);
        }
    };

    if params.do_greedy {
        let edges = greedy(&degrees)?;
        let sr = spectral_radius(edges.n(), edges.edges());
        let run = build_new_run(
            "greedy",
            &degrees,
            Some(params.k as i64),
            sample_seed,
            RunOutcome {
                edges: edges.clone(),
                time_ms: 0,
                objective_mode: "min".to_string(),
                objective_value: sr,
                iterations: None,
                accepted_moves: None,
                meta_params: None,
            },
            params.connected_only,
        )?;
        insert_run(conn, &run)?;
        consider(edges, params.mode);
    }

    if params.do_random {
        for rep in 0..params.random_reps.max(1) {
            let rep_seed = sample_seed.map(|s| s.wrapping_mul(1000).wrapping_add(rep as u64));
            let mut rng = RngHandle::from_seed_or_entropy(rep_seed);
            let edges = random_greedy(&degrees, &mut rng)?;
            let sr = spectral_radius(edges.n(), edges.edges());
            let run = build_new_run(
                "random",
                &degrees,
                Some(params.k as i64),
                rep_seed,
                RunOutcome {
                    edges: edges.clone(),
                    time_ms: 0,
                    objective_mode: "min".to_string(),
                    objective_value: sr,
                    iterations: None,
                    accepted_moves: None,
                    meta_params: None,
                },
                params.connected_only,
            )?;
            insert_run(conn, &run)?;
            consider(edges, params.mode);
        }
    }

    if params.do_exact && degrees.len() <= params.exact_n_max {
        let timeout = Duration::from_secs_f64(params.exact_timeout_s.max(0.0));
        if let Some(edges) = realize_backtracking_with_timeout(degrees.clone(), sample_seed, 200_000, timeout) {
            let sr = spectral_radius(edges.n(), edges.edges());
            let run = build_new_run(
                "exact_realization",
                &degrees,
                Some(params.k as i64),
                sample_seed,
                RunOutcome {
                    edges: edges.clone(),
                    time_ms: 0,
                    objective_mode: "min".to_string(),
                    objective_value: sr,
                    iterations: None,
                    accepted_moves: None,
                    meta_params: None,
                },
                params.connected_only,
            )?;
            insert_run(conn, &run)?;
            consider(edges, params.mode);
        }
    }

    let start_edges = match baseline_edges {
        Some(edges) => edges,
        None => greedy(&degrees)?,
    };

    let hc = hill_climb(&start_edges, sample_seed, params.iters, params.mode, params.connected_only);
    if !params.connected_only || edges_connected(hc.edges.n(), hc.edges.edges()) {
        let meta_params_json = serde_json::to_string(&hc.meta_params).ok();
        let run = build_new_run(
            "hc",
            &degrees,
            Some(params.k as i64),
            sample_seed,
            RunOutcome {
                edges: hc.edges,
                time_ms: hc.time_ms,
                objective_mode: mode_str.to_string(),
                objective_value: hc.spectral_radius,
                iterations: Some(hc.iterations),
                accepted_moves: Some(hc.accepted_moves),
                meta_params: meta_params_json,
            },
            params.connected_only,
        )?;
        insert_run(conn, &run)?;
    }

    let sa = simulated_annealing(
        &start_edges,
        sample_seed,
        params.iters,
        params.t0,
        params.t_end,
        params.mode,
        params.connected_only,
    );
    if !params.connected_only || edges_connected(sa.edges.n(), sa.edges.edges()) {
        let meta_params_json = serde_json::to_string(&sa.meta_params).ok();
        let run = build_new_run(
            "sa",
            &degrees,
            Some(params.k as i64),
            sample_seed,
            RunOutcome {
                edges: sa.edges,
                time_ms: sa.time_ms,
                objective_mode: mode_str.to_string(),
                objective_value: sa.spectral_radius,
                iterations: Some(sa.iterations),
                accepted_moves: Some(sa.accepted_moves),
                meta_params: meta_params_json,
            },
            params.connected_only,
        )?;
        insert_run(conn, &run)?;
    }

    Ok(SampleOutcome {
        message: "ok".to_string(),
        degrees_hash: Some(degrees_hash),
    })
}

/// Runs a full autosearch batch against `db_path`, updating job progress
/// as each sample completes. This owns the connection for the duration of
/// the job so the discovery detector's transaction and the run inserts
/// observe a consistent view of the database.
pub fn run_job(db_path: &std::path::Path, job_id: i64, params: &JobParams) -> Result<(), SpecxError> {
    let mut conn = schema::open(db_path)?;
    schema::mark_job_running(&conn, job_id)?;

    let thresholds = AnomalyThresholds {
        eps: params.eps,
        tri_ratio: params.tri_ratio,
        apl_ratio: params.apl_ratio,
        cl_ratio: params.cl_ratio,
    };

    for i in 0..params.batch {
        let sample_seed = params.seed.map(|s| s.wrapping_add(i as u64));
        let outcome = run_one_sample(&conn, params, sample_seed).unwrap_or_else(|err| SampleOutcome {
            message: format!("iter error: {err}"),
            degrees_hash: None,
        });

        let message = match outcome.degrees_hash {
            Some(degrees_hash) => {
                match try_create_discovery(&mut conn, &degrees_hash, params.mode.as_str(), &thresholds) {
                    Ok(Some(_)) => format!("DISCOVERY: {degrees_hash}"),
                    Ok(None) => outcome.message,
                    Err(err) => format!("iter error: {err}"),
                }
            }
            None => outcome.message,
        };

        schema::update_job_progress(&conn, job_id, (i + 1) as i64, &message)?;
    }

    schema::mark_job_done(&conn, job_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn small_batch_produces_runs_and_completes() {
        let db = NamedTempFile::new().unwrap();
        let params = JobParams {
            n: 8,
            k: 10,
            batch: 2,
            iters: 50,
            do_exact: true,
            exact_n_max: 10,
            exact_timeout_s: 1.0,
            seed: Some(11),
            ..JobParams::default()
        };

        let conn = schema::open(db.path()).unwrap();
        let job_id = schema::insert_job(&conn, &serde_json::to_string(&params).unwrap(), params.batch as i64).unwrap();
        drop(conn);

        run_job(db.path(), job_id, &params).unwrap();

        let conn = schema::open(db.path()).unwrap();
        let job = schema::load_job(&conn, job_id).unwrap().unwrap();
        assert_eq!(job.status, "done");
        assert_eq!(job.progress_done, 2);

        let runs = schema::list_recent_runs(&conn, 100).unwrap();
        assert!(!runs.is_empty());
        assert!(runs.iter().any(|r| r.algorithm == "hc"));
        assert!(runs.iter().any(|r| r.algorithm == "sa"));
    }
}
