use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{autosearch, best_run, generate_degrees, list_discoveries, list_runs, realize_exact, run_basic, run_meta};

mod adapter;
mod commands;
mod job;
mod orchestrator;

#[derive(Parser, Debug)]
#[command(name = "specx", about = "Extremal spectral-radius search engine")]
struct Cli {
    /// Path to the SQLite store. Created (with schema) if it doesn't exist.
    #[arg(long, global = true, default_value = "specx.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a degree sequence with a fixed sum and report graphicality.
    GenerateDegrees(generate_degrees::GenerateDegreesArgs),
    /// Realize a degree sequence with greedy, random, or exact backtracking.
    RunBasic(run_basic::RunBasicArgs),
    /// Improve a realized graph with hill climbing or simulated annealing.
    RunMeta(run_meta::RunMetaArgs),
    /// List recently persisted runs.
    ListRuns(list_runs::ListRunsArgs),
    /// Show the best persisted run for a degree class or (n, k) pair.
    BestRun(best_run::BestRunArgs),
    /// List recently recorded discoveries.
    ListDiscoveries(list_discoveries::ListDiscoveriesArgs),
    /// Start or poll a background autosearch job.
    #[command(subcommand)]
    Autosearch(autosearch::AutosearchCommand),
    /// Worker invocation used internally by the job runtime to bound exact
    /// realization by OS-process termination. Not part of the public CLI.
    #[command(hide = true)]
    RealizeExact(realize_exact::RealizeExactArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::GenerateDegrees(args) => generate_degrees::run(&args),
        Command::RunBasic(args) => run_basic::run(&cli.db, &args),
        Command::RunMeta(args) => run_meta::run(&cli.db, &args),
        Command::ListRuns(args) => list_runs::run(&cli.db, &args),
        Command::BestRun(args) => best_run::run(&cli.db, &args),
        Command::ListDiscoveries(args) => list_discoveries::run(&cli.db, &args),
        Command::Autosearch(cmd) => autosearch::run(&cli.db, cmd),
        Command::RealizeExact(args) => realize_exact::run(&args),
    }
}
