//! `specx generate-degrees` -- mirrors `api_generate`.

use std::error::Error;

use clap::Args;

use crate::adapter::{generate_degrees, GenerateDegreesRequest};

#[derive(Args, Debug)]
pub struct GenerateDegreesArgs {
    /// Vertex count.
    #[arg(long)]
    n: usize,
    /// Target edge count (sum of degrees is 2k).
    #[arg(long)]
    k: u64,
    /// Seed for determinism.
    #[arg(long)]
    seed: Option<u64>,
    /// Repair-retry budget for the generator.
    #[arg(long, default_value_t = 2000)]
    max_attempts: u32,
    /// Print the response as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

pub fn run(args: &GenerateDegreesArgs) -> Result<(), Box<dyn Error>> {
    let req = GenerateDegreesRequest {
        n: args.n,
        k: args.k,
        seed: args.seed,
        max_attempts: args.max_attempts,
    };
    let resp = generate_degrees(&req)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        println!(
            "n={} k={} graphical={} degrees={:?}",
            resp.n, resp.k, resp.graphical, resp.degrees
        );
    }
    Ok(())
}
