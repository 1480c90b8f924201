#![deny(missing_docs)]
//! SQLite-backed persistence for Runs, Discoveries and AutoSearchJobs, plus
//! the new-record/anomaly discovery detector, for the specx extremal
//! spectral-radius search engine.

pub mod discovery;
pub mod schema;

pub use discovery::{anomaly_flags, baseline_stats, try_create_discovery, AnomalyThresholds, BaselineStats};
pub use schema::{
    best_run, init_schema, insert_discovery, insert_job, insert_run, list_recent_discoveries, list_recent_runs,
    load_job, load_runs_by_fingerprint, mark_job_done, mark_job_failed, mark_job_running, open,
    update_job_progress, DiscoveryRecord, JobRecord, NewDiscovery, NewRun, RunRecord, SCHEMA_VERSION,
};
