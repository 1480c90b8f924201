//! `specx list-discoveries` -- mirrors `api_discoveries`.

use std::error::Error;
use std::path::Path;

use clap::Args;
use specx_store::schema;

#[derive(Args, Debug)]
pub struct ListDiscoveriesArgs {
    /// Maximum number of discoveries to list.
    #[arg(long, default_value_t = 20)]
    limit: i64,
    /// Print the discoveries as JSON instead of one summary line each.
    #[arg(long)]
    json: bool,
}

pub fn run(db: &Path, args: &ListDiscoveriesArgs) -> Result<(), Box<dyn Error>> {
    let conn = schema::open(db)?;
    let discoveries = schema::list_recent_discoveries(&conn, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&discoveries)?);
    } else {
        for d in &discoveries {
            println!(
                "#{:<5} {:<5} {:<4} best_run={:<5} new_best={:<10.6} improvement={:?} flags={} note={}",
                d.id, d.mode, d.degrees_hash, d.best_run_id, d.new_best_value, d.improvement, d.anomaly_flags, d.note
            );
        }
    }
    Ok(())
}
