//! `specx realize-exact` -- the hidden worker invocation the job runtime
//! shells out to for exact (backtracking) realization. Not part of the
//! public command table (`specx --help` does not list it): it exists so
//! the caller can bound the search by OS-process termination instead of
//! abandoning a runaway thread. On success it prints the realized edge
//! list as a JSON array of `[u, v]` pairs to stdout and exits 0; on a
//! non-graphical sequence or backtracking failure it prints nothing and
//! exits 1.

use std::error::Error;

use clap::Args;
use specx_core::rng::RngHandle;
use specx_graph::realize::backtracking;

#[derive(Args, Debug)]
pub struct RealizeExactArgs {
    /// Comma-separated degree sequence, e.g. "3,3,3,3".
    #[arg(long, value_delimiter = ',')]
    degrees: Vec<u32>,
    /// Seed for the search. Omit for OS-entropy seeding.
    #[arg(long)]
    seed: Option<u64>,
    /// Backtracking step budget.
    #[arg(long, default_value_t = 500_000)]
    max_steps: u64,
}

pub fn run(args: &RealizeExactArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = RngHandle::from_seed_or_entropy(args.seed);
    match backtracking(&args.degrees, &mut rng, args.max_steps) {
        Ok(edges) => {
            println!("{}", serde_json::to_string(edges.edges())?);
            Ok(())
        }
        Err(_) => std::process::exit(1),
    }
}
