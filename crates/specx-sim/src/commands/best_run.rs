//! `specx best-run` -- mirrors `api_final`.

use std::error::Error;
use std::path::Path;

use clap::Args;
use specx_core::types::Mode;
use specx_store::schema;

use crate::adapter::run_summary_line;

#[derive(Args, Debug)]
pub struct BestRunArgs {
    /// Restrict to this degree-sequence fingerprint.
    #[arg(long)]
    degrees_hash: Option<String>,
    /// Restrict to this vertex count.
    #[arg(long)]
    n: Option<i64>,
    /// Restrict to this target edge count.
    #[arg(long)]
    k: Option<i64>,
    /// Search direction: "min" or "max".
    #[arg(long, default_value = "min")]
    mode: Mode,
    /// Print the run as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

pub fn run(db: &Path, args: &BestRunArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;
    let best = schema::best_run(&conn, args.degrees_hash.as_deref(), args.n, args.k, args.mode.as_str())?;

    match best {
        Some(run) if args.json => println!("{}", serde_json::to_string_pretty(&run)?),
        Some(run) => println!("{}", run_summary_line(&run)),
        None => println!("no matching runs"),
    }
    Ok(())
}
