pub mod autosearch;
pub mod best_run;
pub mod generate_degrees;
pub mod list_discoveries;
pub mod list_runs;
pub mod realize_exact;
pub mod run_basic;
pub mod run_meta;
