//! `specx run-basic` -- mirrors `_api_run_basic` / `api_run_greedy` /
//! `api_run_random` / `api_run_exact`.

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use clap::{Args, ValueEnum};
use specx_aut::spectral_radius;
use specx_core::rng::RngHandle;
use specx_graph::realize::{greedy, random_greedy};
use specx_store::schema::{self, insert_run};

use crate::adapter::{build_new_run, run_summary_line, RunOutcome};
use crate::job::realize_backtracking_with_timeout;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BasicAlgorithm {
    Greedy,
    Random,
    Exact,
}

#[derive(Args, Debug)]
pub struct RunBasicArgs {
    /// Comma-separated degree sequence, e.g. "3,3,3,3".
    #[arg(long, value_delimiter = ',')]
    degrees: Vec<u32>,
    /// Which realization algorithm to run.
    #[arg(long, value_enum)]
    algorithm: BasicAlgorithm,
    /// Target edge count, recorded alongside the run.
    #[arg(long)]
    k: Option<i64>,
    /// Seed for the random/exact algorithms.
    #[arg(long)]
    seed: Option<u64>,
    /// Reject disconnected realizations.
    #[arg(long)]
    connected_only: bool,
    /// Wall-clock budget for exact realization, in seconds.
    #[arg(long, default_value_t = 5.0)]
    timeout_s: f64,
    /// Backtracking step budget for exact realization.
    #[arg(long, default_value_t = 500_000)]
    max_steps: u64,
    /// Print the persisted run as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

pub fn run(db: &Path, args: &RunBasicArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;

    let (algorithm, edges) = match args.algorithm {
        BasicAlgorithm::Greedy => ("greedy", greedy(&args.degrees)?),
        BasicAlgorithm::Random => {
            let mut rng = RngHandle::from_seed_or_entropy(args.seed);
            ("random", random_greedy(&args.degrees, &mut rng)?)
        }
        BasicAlgorithm::Exact => {
            let timeout = Duration::from_secs_f64(args.timeout_s.max(0.0));
            match realize_backtracking_with_timeout(args.degrees.clone(), args.seed, args.max_steps, timeout) {
                Some(edges) => ("exact_realization", edges),
                None => {
                    println!("exact realization timed out or the sequence is not graphical");
                    return Ok(());
                }
            }
        }
    };

    let sr = spectral_radius(edges.n(), edges.edges());
    let outcome = RunOutcome {
        edges,
        time_ms: 0,
        objective_mode: "min".to_string(),
        objective_value: sr,
        iterations: None,
        accepted_moves: None,
        meta_params: None,
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
