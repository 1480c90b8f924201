//! `specx list-runs` -- mirrors `api_runs`.

use std::error::Error;
use std::path::Path;

use clap::Args;
use specx_store::schema;

use crate::adapter::run_summary_line;

#[derive(Args, Debug)]
pub struct ListRunsArgs {
    /// Only list runs for this degree-sequence fingerprint.
    #[arg(long)]
    degrees_hash: Option<String>,
    /// Maximum number of runs to list.
    #[arg(long, default_value_t = 20)]
    limit: i64,
    /// Print the runs as JSON instead of one summary line each.
    #[arg(long)]
    json: bool,
}

pub fn run(db: &Path, args: &ListRunsArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;
    let runs = match &args.degrees_hash {
        Some(hash) => schema::load_runs_by_fingerprint(&conn, hash, None)?,
        None => schema::list_recent_runs(&conn, args.limit)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
    } else {
        for run in &runs {
            println!("{}", run_summary_line(run));
        }
    }
    Ok(())
}
