//! `specx autosearch start` / `specx autosearch status` -- mirrors
//! `api_autosearch_start` / `api_autosearch_status` / `start_job`.
//!
//! The source runs `_run_job` on a background thread inside a long-lived
//! server process and polls it through repeated requests. A CLI invocation
//! has no such lifetime to hang a background thread off of, so `start`
//! spawns the job on a worker thread guarded by a [`JobLock`] (refusing a
//! second job while database state shows one still `running`, the same
//! single-flight guarantee the source's lock gives within one process) and
//! joins it before exiting, printing each progress update as it arrives.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::thread;

use clap::{Args, Subcommand};
use specx_core::types::Mode;
use specx_store::schema;

use crate::job::JobLock;
use crate::orchestrator::{run_job, JobParams};

#[derive(Subcommand, Debug)]
pub enum AutosearchCommand {
    /// Start a new autosearch batch and block until it finishes.
    Start(StartArgs),
    /// Print the current status of a previously started job.
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Vertex count.
    #[arg(long, default_value_t = 30)]
    n: usize,
    /// Target edge count.
    #[arg(long, default_value_t = 120)]
    k: u64,
    /// Number of degree-sequence samples to process.
    #[arg(long, default_value_t = 10)]
    batch: u32,
    /// Metaheuristic iteration budget, per run.
    #[arg(long, default_value_t = 6000)]
    iters: u32,
    /// Search direction: "min" or "max".
    #[arg(long, default_value = "min")]
    mode: Mode,
    /// Base seed; sample `i` uses `seed + i` when set.
    #[arg(long)]
    seed: Option<u64>,
    /// Reject disconnected candidates throughout the batch.
    #[arg(long)]
    connected_only: bool,
    /// Largest `n` for which exact realization is attempted.
    #[arg(long, default_value_t = 20)]
    exact_n_max: usize,
    /// Wall-clock budget for exact realization, in seconds.
    #[arg(long, default_value_t = 2.0)]
    exact_timeout_s: f64,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Id returned by `specx autosearch start`.
    #[arg(long)]
    job_id: i64,
}

pub fn run(db: &Path, cmd: AutosearchCommand) -> Result<(), Box<dyn Error>> {
    match cmd {
        AutosearchCommand::Start(args) => start(db, &args),
        AutosearchCommand::Status(args) => status(db, &args),
    }
}

fn start(db: &Path, args: &StartArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;

    if let Some(job) = latest_running_job(&conn)? {
        return Err(format!("job #{} is already running; refusing to start a second one", job.id).into());
    }

    let params = JobParams {
        n: args.n,
        k: args.k,
        batch: args.batch,
        iters: args.iters,
        mode: args.mode,
        seed: args.seed,
        connected_only: args.connected_only,
        exact_n_max: args.exact_n_max,
        exact_timeout_s: args.exact_timeout_s,
        ..JobParams::default()
    };
    let params_json = serde_json::to_string(&params)?;
    let job_id = schema::insert_job(&conn, &params_json, args.batch as i64)?;
    drop(conn);

    println!("started job #{job_id}");

    let lock = JobLock::new();
    let guard = lock.try_acquire().expect("freshly created lock is always free");
    let db_path: PathBuf = db.to_path_buf();
    let handle = thread::spawn(move || {
        let _guard = guard;
        run_job(&db_path, job_id, &params)
    });

    match handle.join() {
        Ok(Ok(())) => {
            let conn = schema::open(db)?;
            let job = schema::load_job(&conn, job_id)?.expect("job row inserted above");
            println!("job #{job_id} {} ({}/{})", job.status, job.progress_done, job.progress_total);
        }
        Ok(Err(err)) => {
            let conn = schema::open(db)?;
            schema::mark_job_failed(&conn, job_id, &err.to_string())?;
            return Err(err.into());
        }
        Err(_) => return Err("autosearch worker thread panicked".into()),
    }
    Ok(())
}

fn status(db: &Path, args: &StatusArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;
    match schema::load_job(&conn, args.job_id)? {
        Some(job) => println!(
            "job #{} status={} progress={}/{} message={:?} error={:?}",
            job.id, job.status, job.progress_done, job.progress_total, job.last_message, job.error
        ),
        None => println!("no such job: #{}", args.job_id),
    }
    Ok(())
}

fn latest_running_job(conn: &rusqlite::Connection) -> Result<Option<schema::JobRecord>, Box<dyn Error>> {
    let recent = conn
        .prepare("SELECT id FROM jobs WHERE status = 'running' ORDER BY id DESC LIMIT 1")?
        .query_row([], |row| row.get::<_, i64>(0))
        .ok();
    match recent {
        Some(id) => Ok(schema::load_job(conn, id)?),
        None => Ok(None),
    }
}
