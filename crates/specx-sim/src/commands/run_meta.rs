//! `specx run-meta` -- mirrors `_run_meta_common` / `api_run_hc` /
//! `api_run_sa`. Starts from a greedy realization of the given degree
//! sequence, the same baseline the autosearch batch loop falls back to
//! when no baseline algorithm beat it.

use std::error::Error;
use std::path::Path;

use clap::{Args, ValueEnum};
use specx_core::types::Mode;
use specx_graph::realize::greedy;
use specx_meta::{hill_climb, simulated_annealing};
use specx_store::schema::{self, insert_run};

use crate::adapter::{build_new_run, run_summary_line, RunOutcome};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MetaAlgorithm {
    Hc,
    Sa,
}

#[derive(Args, Debug)]
pub struct RunMetaArgs {
    /// Comma-separated degree sequence, e.g. "3,3,3,3".
    #[arg(long, value_delimiter = ',')]
    degrees: Vec<u32>,
    /// Which metaheuristic to run.
    #[arg(long, value_enum)]
    algorithm: MetaAlgorithm,
    /// Target edge count, recorded alongside the run.
    #[arg(long)]
    k: Option<i64>,
    /// Seed for the search.
    #[arg(long)]
    seed: Option<u64>,
    /// Search direction: "min" or "max".
    #[arg(long, default_value = "min")]
    mode: Mode,
    /// Iteration budget.
    #[arg(long, default_value_t = 6000)]
    iters: u32,
    /// Simulated annealing starting temperature.
    #[arg(long, default_value_t = 1.0)]
    t0: f64,
    /// Simulated annealing ending temperature.
    #[arg(long, default_value_t = 0.001)]
    t_end: f64,
    /// Reject disconnected candidates throughout the search.
    #[arg(long)]
    connected_only: bool,
    /// Print the persisted run as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

pub fn run(db: &Path, args: &RunMetaArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;
    let start_edges = greedy(&args.degrees)?;

    let (algorithm, edges, time_ms, iterations, accepted_moves, meta_params_json) = match args.algorithm {
        MetaAlgorithm::Hc => {
            let result = hill_climb(&start_edges, args.seed, args.iters, args.mode, args.connected_only);
            (
                "hc",
                result.edges,
                result.time_ms,
                result.iterations,
                result.accepted_moves,
                serde_json::to_string(&result.meta_params).ok(),
            )
        }
        MetaAlgorithm::Sa => {
            let result = simulated_annealing(
                &start_edges,
                args.seed,
                args.iters,
                args.t0,
                args.t_end,
                args.mode,
                args.connected_only,
            );
            (
                "sa",
                result.edges,
                result.time_ms,
                result.iterations,
                result.accepted_moves,
                serde_json::to_string(&result.meta_params).ok(),
            )
        }
    };

    let sr = specx_aut::spectral_radius(edges.n(), edges.edges());
    let outcome = RunOutcome {
        edges,
        time_ms,
        objective_mode: args.mode.as_str().to_string(),
        objective_value: sr,
        iterations: Some(iterations),
        accepted_moves: Some(accepted_moves),
        meta_params: meta_params_json,
    };
    let new_run = build_new_run(algorithm, &args.degrees, args.k, args.seed, outcome, args.connected_only)?;
    let id = insert_run(&conn, &new_run)?;
    let saved = schema::load_runs_by_fingerprint(&conn, &new_run.degrees_hash, None)?
        .into_iter()
        .find(|r| r.id == id)
        .expect("just-inserted run must be queryable");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        println!("{}", run_summary_line(&saved));
    }
    Ok(())
}
