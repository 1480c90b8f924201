//! SQLite schema and row-level CRUD for Runs, Discoveries and
//! AutoSearchJobs.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use specx_core::errors::{ErrorInfo, SpecxError};

/// Current on-disk schema version. Bumped whenever a migration is needed.
pub const SCHEMA_VERSION: i64 = 1;

fn store_err(code: &str, err: impl std::fmt::Display) -> SpecxError {
    SpecxError::Store(ErrorInfo::new(code, err.to_string()))
}

/// One persisted realization or metaheuristic run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Auto-increment row id.
    pub id: i64,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Vertex count.
    pub n: i64,
    /// Target edge count, if known.
    pub k: Option<i64>,
    /// Degree sequence, in original (unsorted) order.
    pub degrees: Vec<i64>,
    /// Stable fingerprint of `degrees` (hex-encoded).
    pub degrees_hash: String,
    /// Algorithm tag: `greedy` / `random` / `exact_realization` / `hc` / `sa`.
    pub algorithm: String,
    /// Edges as `[u, v]` pairs.
    pub edges: Vec<[i64; 2]>,
    /// Base64-wrapped graph6 string.
    pub graph6_b64: String,
    /// Base64-wrapped canonical graph6 string.
    pub canonical_g6_b64: String,
    /// Decoded graph6 string.
    pub graph6_decoded: Option<String>,
    /// Decoded canonical graph6 string.
    pub canonical_g6_decoded: Option<String>,
    /// Wall-clock time taken to produce this run, in milliseconds.
    pub time_ms: i64,
    /// Seed the run was derived from, if any.
    pub seed: Option<i64>,
    /// Whether the degree sequence was confirmed graphical.
    pub is_graphical: bool,
    /// Objective name, always `spectral_radius` today.
    pub objective_name: String,
    /// Search direction: `min` or `max`.
    pub objective_mode: String,
    /// Value of the objective for this run.
    pub objective_value: Option<f64>,
    /// Spectral radius of the realized graph.
    pub spectral_radius: Option<f64>,
    /// Iteration budget consumed (metaheuristic runs only).
    pub iterations: Option<i64>,
    /// Number of accepted moves (metaheuristic runs only).
    pub accepted_moves: Option<i64>,
    /// Free-form meta-parameters (seed, mode, temperature schedule, ...),
    /// serialized as JSON.
    pub meta_params: Option<String>,
    /// Whether this run only accepted connected candidates.
    pub connected_only: bool,
    /// Triangle count.
    pub triangles: Option<i64>,
    /// Average shortest-path length, `None` if disconnected.
    pub avg_path_len: Option<f64>,
    /// Average local clustering coefficient.
    pub clustering: Option<f64>,
    /// Whether the realized graph is connected.
    pub is_connected: Option<bool>,
}

/// A new-record or anomaly event for a `(degrees_hash, mode)` class.
/// Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    /// Auto-increment row id.
    pub id: i64,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Degree-sequence fingerprint this discovery belongs to.
    pub degrees_hash: String,
    /// Search direction: `min` or `max`.
    pub mode: String,
    /// Objective name, always `spectral_radius` today.
    pub objective_name: String,
    /// Id of the [`RunRecord`] that produced this discovery.
    pub best_run_id: i64,
    /// Previous best value for this class, if one existed.
    pub prev_best_value: Option<f64>,
    /// The new best (or anomalous) value.
    pub new_best_value: f64,
    /// Magnitude of improvement over the previous best, if this is a new
    /// record; `Some(0.0)` for an anomaly-without-record entry.
    pub improvement: Option<f64>,
    /// Anomaly flags, in detection order, serialized as a JSON array.
    pub anomaly_flags: String,
    /// Free-text note describing the event.
    pub note: String,
}

/// Background autosearch job state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Auto-increment row id.
    pub id: i64,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// When the job transitioned to `running`, if it has.
    pub started_at: Option<String>,
    /// When the job transitioned to `done` or `failed`, if it has.
    pub finished_at: Option<String>,
    /// `queued` / `running` / `done` / `failed`.
    pub status: String,
    /// Job parameters, serialized as JSON.
    pub params: String,
    /// Iterations of the batch completed so far.
    pub progress_done: i64,
    /// Total iterations in the batch.
    pub progress_total: i64,
    /// Most recent progress message.
    pub last_message: String,
    /// Fatal error message, if the job failed.
    pub error: String,
}

/// Opens a SQLite connection with foreign keys enabled and runs
/// [`init_schema`] on it.
pub fn open(path: &std::path::Path) -> Result<Connection, SpecxError> {
    let conn = Connection::open(path).map_err(|err| store_err("specx_store.open", err))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| store_err("specx_store.pragma", err))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the schema if absent and records [`SCHEMA_VERSION`] in the
/// `meta` table.
///
/// `discoveries.best_run_id` cascades on delete: deleting a Run deletes
/// every Discovery that points at it, per the data model's ownership rule.
pub fn init_schema(conn: &Connection) -> Result<(), SpecxError> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS meta(version INTEGER NOT NULL);
        CREATE TABLE IF NOT EXISTS runs(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            n INTEGER NOT NULL,
            k INTEGER,
            degrees TEXT NOT NULL,
            degrees_hash TEXT NOT NULL,
            algorithm TEXT NOT NULL,
            edges TEXT NOT NULL,
            graph6_b64 TEXT NOT NULL,
            canonical_g6_b64 TEXT NOT NULL,
            graph6_decoded TEXT,
            canonical_g6_decoded TEXT,
            time_ms INTEGER NOT NULL,
            seed INTEGER,
            is_graphical INTEGER NOT NULL DEFAULT 1,
            objective_name TEXT NOT NULL DEFAULT 'spectral_radius',
            objective_mode TEXT NOT NULL DEFAULT 'min',
            objective_value REAL,
            spectral_radius REAL,
            iterations INTEGER,
            accepted_moves INTEGER,
            meta_params TEXT,
            connected_only INTEGER NOT NULL DEFAULT 0,
            triangles INTEGER,
            avg_path_len REAL,
            clustering REAL,
            is_connected INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_runs_degrees_hash ON runs(degrees_hash);
        CREATE TABLE IF NOT EXISTS discoveries(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            degrees_hash TEXT NOT NULL,
            mode TEXT NOT NULL,
            objective_name TEXT NOT NULL DEFAULT 'spectral_radius',
            best_run_id INTEGER NOT NULL,
            prev_best_value REAL,
            new_best_value REAL NOT NULL,
            improvement REAL,
            anomaly_flags TEXT NOT NULL DEFAULT '[]',
            note TEXT NOT NULL DEFAULT '',
            FOREIGN KEY(best_run_id) REFERENCES runs(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_discoveries_hash_mode ON discoveries(degrees_hash, mode);
        CREATE TABLE IF NOT EXISTS jobs(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            started_at TEXT,
            finished_at TEXT,
            status TEXT NOT NULL DEFAULT 'queued',
            params TEXT NOT NULL DEFAULT '{}',
            progress_done INTEGER NOT NULL DEFAULT 0,
            progress_total INTEGER NOT NULL DEFAULT 0,
            last_message TEXT NOT NULL DEFAULT '',
            error TEXT NOT NULL DEFAULT ''
        );
        COMMIT;",
    )
    .map_err(|err| store_err("specx_store.schema", err))?;
    set_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

fn set_version(conn: &Connection, version: i64) -> Result<(), SpecxError> {
    let existing: Option<i64> = conn
        .query_row("SELECT version FROM meta LIMIT 1", [], |row| row.get(0))
        .optional()
        .map_err(|err| store_err("specx_store.schema", err))?;
    match existing {
        Some(current) if current == version => Ok(()),
        Some(current) => Err(store_err(
            "specx_store.schema_version",
            format!("store schema {current} incompatible with expected {version}"),
        )),
        None => {
            conn.execute("INSERT INTO meta(version) VALUES (?)", params![version])
                .map_err(|err| store_err("specx_store.schema", err))?;
            Ok(())
        }
    }
}

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    let degrees_json: String = row.get("degrees")?;
    let edges_json: String = row.get("edges")?;
    Ok(RunRecord {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        n: row.get("n")?,
        k: row.get("k")?,
        degrees: serde_json::from_str(&degrees_json).unwrap_or_default(),
        degrees_hash: row.get("degrees_hash")?,
        algorithm: row.get("algorithm")?,
        edges: serde_json::from_str(&edges_json).unwrap_or_default(),
        graph6_b64: row.get("graph6_b64")?,
        canonical_g6_b64: row.get("canonical_g6_b64")?,
        graph6_decoded: row.get("graph6_decoded")?,
        canonical_g6_decoded: row.get("canonical_g6_decoded")?,
        time_ms: row.get("time_ms")?,
        seed: row.get("seed")?,
        is_graphical: row.get::<_, i64>("is_graphical")? != 0,
        objective_name: row.get("objective_name")?,
        objective_mode: row.get("objective_mode")?,
        objective_value: row.get("objective_value")?,
        spectral_radius: row.get("spectral_radius")?,
        iterations: row.get("iterations")?,
        accepted_moves: row.get("accepted_moves")?,
        meta_params: row.get("meta_params")?,
        connected_only: row.get::<_, i64>("connected_only")? != 0,
        triangles: row.get("triangles")?,
        avg_path_len: row.get("avg_path_len")?,
        clustering: row.get("clustering")?,
        is_connected: row.get::<_, Option<i64>>("is_connected")?.map(|v| v != 0),
    })
}

/// A Run awaiting insertion; everything but the id and timestamp, which
/// the store assigns.
#[derive(Debug, Clone)]
pub struct NewRun {
    /// See [`RunRecord`] for field documentation.
    pub n: i64,
    /// See [`RunRecord`].
    pub k: Option<i64>,
    /// See [`RunRecord`].
    pub degrees: Vec<i64>,
    /// See [`RunRecord`].
    pub degrees_hash: String,
    /// See [`RunRecord`].
    pub algorithm: String,
    /// See [`RunRecord`].
    pub edges: Vec<[i64; 2]>,
    /// See [`RunRecord`].
    pub graph6_b64: String,
    /// See [`RunRecord`].
    pub canonical_g6_b64: String,
    /// See [`RunRecord`].
    pub graph6_decoded: Option<String>,
    /// See [`RunRecord`].
    pub canonical_g6_decoded: Option<String>,
    /// See [`RunRecord`].
    pub time_ms: i64,
    /// See [`RunRecord`].
    pub seed: Option<i64>,
    /// See [`RunRecord`].
    pub is_graphical: bool,
    /// See [`RunRecord`].
    pub objective_name: String,
    /// See [`RunRecord`].
    pub objective_mode: String,
    /// See [`RunRecord`].
    pub objective_value: Option<f64>,
    /// See [`RunRecord`].
    pub spectral_radius: Option<f64>,
    /// See [`RunRecord`].
    pub iterations: Option<i64>,
    /// See [`RunRecord`].
    pub accepted_moves: Option<i64>,
    /// See [`RunRecord`].
    pub meta_params: Option<String>,
    /// See [`RunRecord`].
    pub connected_only: bool,
    /// See [`RunRecord`].
    pub triangles: Option<i64>,
    /// See [`RunRecord`].
    pub avg_path_len: Option<f64>,
    /// See [`RunRecord`].
    pub clustering: Option<f64>,
    /// See [`RunRecord`].
    pub is_connected: Option<bool>,
}

/// Inserts a new Run and returns its assigned id.
pub fn insert_run(conn: &Connection, run: &NewRun) -> Result<i64, SpecxError> {
    let created_at = Utc::now().to_rfc3339();
    let degrees_json = serde_json::to_string(&run.degrees).map_err(|err| store_err("specx_store.insert_run", err))?;
    let edges_json = serde_json::to_string(&run.edges).map_err(|err| store_err("specx_store.insert_run", err))?;

    conn.execute(
        "INSERT INTO runs (
            created_at, n, k, degrees, degrees_hash, algorithm, edges,
            graph6_b64, canonical_g6_b64, graph6_decoded, canonical_g6_decoded,
            time_ms, seed, is_graphical, objective_name, objective_mode,
            objective_value, spectral_radius, iterations, accepted_moves,
            meta_params, connected_only, triangles, avg_path_len, clustering,
            is_connected
        ) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)",
        params![
            created_at,
            run.n,
            run.k,
            degrees_json,
            run.degrees_hash,
            run.algorithm,
            edges_json,
            run.graph6_b64,
            run.canonical_g6_b64,
            run.graph6_decoded,
            run.canonical_g6_decoded,
            run.time_ms,
            run.seed,
            run.is_graphical as i64,
            run.objective_name,
            run.objective_mode,
            run.objective_value,
            run.spectral_radius,
            run.iterations,
            run.accepted_moves,
            run.meta_params,
            run.connected_only as i64,
            run.triangles,
            run.avg_path_len,
            run.clustering,
            run.is_connected.map(|b| b as i64),
        ],
    )
    .map_err(|err| store_err("specx_store.insert_run", err))?;
    Ok(conn.last_insert_rowid())
}

/// Loads every Run for a given degree fingerprint, optionally filtered to
/// an algorithm allow-list.
pub fn load_runs_by_fingerprint(
    conn: &Connection,
    degrees_hash: &str,
    algorithms: Option<&[&str]>,
) -> Result<Vec<RunRecord>, SpecxError> {
    let mut stmt = conn
        .prepare("SELECT * FROM runs WHERE degrees_hash = ? ORDER BY id")
        .map_err(|err| store_err("specx_store.query", err))?;
    let rows = stmt
        .query_map(params![degrees_hash], row_to_run)
        .map_err(|err| store_err("specx_store.query", err))?;
    let all = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| store_err("specx_store.query", err))?;

    Ok(match algorithms {
        None => all,
        Some(allow) => all
            .into_iter()
            .filter(|r| allow.contains(&r.algorithm.as_str()))
            .collect(),
    })
}

/// The most recent `limit` Runs, newest first.
pub fn list_recent_runs(conn: &Connection, limit: i64) -> Result<Vec<RunRecord>, SpecxError> {
    let mut stmt = conn
        .prepare("SELECT * FROM runs ORDER BY id DESC LIMIT ?")
        .map_err(|err| store_err("specx_store.query", err))?;
    let rows = stmt
        .query_map(params![limit], row_to_run)
        .map_err(|err| store_err("specx_store.query", err))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|err| store_err("specx_store.query", err))
}

/// The single best Run for `(n, k)` or a given `degrees_hash` by objective
/// value, respecting search direction.
pub fn best_run(
    conn: &Connection,
    degrees_hash: Option<&str>,
    n: Option<i64>,
    k: Option<i64>,
    mode: &str,
) -> Result<Option<RunRecord>, SpecxError> {
    let order = if mode == "min" { "objective_value ASC" } else { "objective_value DESC" };
    let sql = format!(
        "SELECT * FROM runs WHERE objective_value IS NOT NULL
         AND (?1 IS NULL OR degrees_hash = ?1)
         AND (?2 IS NULL OR n = ?2)
         AND (?3 IS NULL OR k = ?3)
         ORDER BY {order}, time_ms ASC LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql).map_err(|err| store_err("specx_store.query", err))?;
    stmt.query_row(params![degrees_hash, n, k], row_to_run)
        .optional()
        .map_err(|err| store_err("specx_store.query", err))
}

fn row_to_discovery(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiscoveryRecord> {
    Ok(DiscoveryRecord {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        degrees_hash: row.get("degrees_hash")?,
        mode: row.get("mode")?,
        objective_name: row.get("objective_name")?,
        best_run_id: row.get("best_run_id")?,
        prev_best_value: row.get("prev_best_value")?,
        new_best_value: row.get("new_best_value")?,
        improvement: row.get("improvement")?,
        anomaly_flags: row.get("anomaly_flags")?,
        note: row.get("note")?,
    })
}

/// A Discovery awaiting insertion.
#[derive(Debug, Clone)]
pub struct NewDiscovery {
    /// See [`DiscoveryRecord`].
    pub degrees_hash: String,
    /// See [`DiscoveryRecord`].
    pub mode: String,
    /// See [`DiscoveryRecord`].
    pub objective_name: String,
    /// See [`DiscoveryRecord`].
    pub best_run_id: i64,
    /// See [`DiscoveryRecord`].
    pub prev_best_value: Option<f64>,
    /// See [`DiscoveryRecord`].
    pub new_best_value: f64,
    /// See [`DiscoveryRecord`].
    pub improvement: Option<f64>,
    /// See [`DiscoveryRecord`].
    pub anomaly_flags: Vec<String>,
    /// See [`DiscoveryRecord`].
    pub note: String,
}

/// Inserts a new Discovery and returns its assigned id.
pub fn insert_discovery(conn: &Connection, discovery: &NewDiscovery) -> Result<i64, SpecxError> {
    let created_at = Utc::now().to_rfc3339();
    let flags_json =
        serde_json::to_string(&discovery.anomaly_flags).map_err(|err| store_err("specx_store.insert_discovery", err))?;
    conn.execute(
        "INSERT INTO discoveries (
            created_at, degrees_hash, mode, objective_name, best_run_id,
            prev_best_value, new_best_value, improvement, anomaly_flags, note
        ) VALUES (?,?,?,?,?,?,?,?,?,?)",
        params![
            created_at,
            discovery.degrees_hash,
            discovery.mode,
            discovery.objective_name,
            discovery.best_run_id,
            discovery.prev_best_value,
            discovery.new_best_value,
            discovery.improvement,
            flags_json,
            discovery.note,
        ],
    )
    .map_err(|err| store_err("specx_store.insert_discovery", err))?;
    Ok(conn.last_insert_rowid())
}

/// The most recently created Discovery for a `(degrees_hash, mode)` class.
pub fn latest_discovery(
    conn: &Connection,
    degrees_hash: &str,
    mode: &str,
) -> Result<Option<DiscoveryRecord>, SpecxError> {
    conn.query_row(
        "SELECT * FROM discoveries WHERE degrees_hash = ?1 AND mode = ?2 ORDER BY id DESC LIMIT 1",
        params![degrees_hash, mode],
        row_to_discovery,
    )
    .optional()
    .map_err(|err| store_err("specx_store.query", err))
}

/// The most recent `limit` Discoveries, newest first.
pub fn list_recent_discoveries(conn: &Connection, limit: i64) -> Result<Vec<DiscoveryRecord>, SpecxError> {
    let mut stmt = conn
        .prepare("SELECT * FROM discoveries ORDER BY id DESC LIMIT ?")
        .map_err(|err| store_err("specx_store.query", err))?;
    let rows = stmt
        .query_map(params![limit], row_to_discovery)
        .map_err(|err| store_err("specx_store.query", err))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|err| store_err("specx_store.query", err))
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        started_at: row.get("started_at")?,
        finished_at: row.get("finished_at")?,
        status: row.get("status")?,
        params: row.get("params")?,
        progress_done: row.get("progress_done")?,
        progress_total: row.get("progress_total")?,
        last_message: row.get("last_message")?,
        error: row.get("error")?,
    })
}

/// Inserts a new job in `queued` status and returns its assigned id.
pub fn insert_job(conn: &Connection, params_json: &str, progress_total: i64) -> Result<i64, SpecxError> {
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO jobs (created_at, status, params, progress_total, last_message)
         VALUES (?, 'queued', ?, ?, 'queued')",
        params![created_at, params_json, progress_total],
    )
    .map_err(|err| store_err("specx_store.insert_job", err))?;
    Ok(conn.last_insert_rowid())
}

/// Loads a single job by id.
pub fn load_job(conn: &Connection, job_id: i64) -> Result<Option<JobRecord>, SpecxError> {
    conn.query_row("SELECT * FROM jobs WHERE id = ?", params![job_id], row_to_job)
        .optional()
        .map_err(|err| store_err("specx_store.query", err))
}

/// Marks a job as `running`, recording its start timestamp.
pub fn mark_job_running(conn: &Connection, job_id: i64) -> Result<(), SpecxError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE jobs SET status = 'running', started_at = ?, last_message = 'running' WHERE id = ?",
        params![now, job_id],
    )
    .map_err(|err| store_err("specx_store.update_job", err))?;
    Ok(())
}

/// Updates a job's progress counters and last message.
pub fn update_job_progress(
    conn: &Connection,
    job_id: i64,
    progress_done: i64,
    last_message: &str,
) -> Result<(), SpecxError> {
    conn.execute(
        "UPDATE jobs SET progress_done = ?, last_message = ? WHERE id = ?",
        params![progress_done, last_message, job_id],
    )
    .map_err(|err| store_err("specx_store.update_job", err))?;
    Ok(())
}

/// Marks a job `done`, recording its finish timestamp.
pub fn mark_job_done(conn: &Connection, job_id: i64) -> Result<(), SpecxError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE jobs SET status = 'done', finished_at = ?, last_message = 'done' WHERE id = ?",
        params![now, job_id],
    )
    .map_err(|err| store_err("specx_store.update_job", err))?;
    Ok(())
}

/// Marks a job `failed` with the given error message.
pub fn mark_job_failed(conn: &Connection, job_id: i64, error: &str) -> Result<(), SpecxError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE jobs SET status = 'failed', finished_at = ?, error = ? WHERE id = ?",
        params![now, error, job_id],
    )
    .map_err(|err| store_err("specx_store.update_job", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_run(n: i64, degrees_hash: &str, objective_value: f64, time_ms: i64) -> NewRun {
        NewRun {
            n,
            k: Some(n * 2),
            degrees: vec![2; n as usize],
            degrees_hash: degrees_hash.to_string(),
            algorithm: "greedy".to_string(),
            edges: vec![],
            graph6_b64: "".to_string(),
            canonical_g6_b64: "".to_string(),
            graph6_decoded: None,
            canonical_g6_decoded: None,
            time_ms,
            seed: Some(1),
            is_graphical: true,
            objective_name: "spectral_radius".to_string(),
            objective_mode: "min".to_string(),
            objective_value: Some(objective_value),
            spectral_radius: Some(objective_value),
            iterations: None,
            accepted_moves: None,
            meta_params: None,
            connected_only: false,
            triangles: Some(0),
            avg_path_len: Some(2.0),
            clustering: Some(0.0),
            is_connected: Some(true),
        }
    }

    #[test]
    fn schema_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn insert_and_query_runs_by_fingerprint() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        insert_run(&conn, &new_run(5, "abc", 2.0, 10)).unwrap();
        insert_run(&conn, &new_run(5, "abc", 1.5, 20)).unwrap();
        insert_run(&conn, &new_run(5, "xyz", 9.0, 5)).unwrap();

        let runs = load_runs_by_fingerprint(&conn, "abc", None).unwrap();
        assert_eq!(runs.len(), 2);

        let best = best_run(&conn, Some("abc"), None, None, "min").unwrap().unwrap();
        assert_eq!(best.objective_value, Some(1.5));
    }

    #[test]
    fn discovery_cascades_on_run_delete() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let run_id = insert_run(&conn, &new_run(5, "abc", 2.0, 10)).unwrap();
        insert_discovery(
            &conn,
            &NewDiscovery {
                degrees_hash: "abc".to_string(),
                mode: "min".to_string(),
                objective_name: "spectral_radius".to_string(),
                best_run_id: run_id,
                prev_best_value: None,
                new_best_value: 2.0,
                improvement: None,
                anomaly_flags: vec![],
                note: "FIRST".to_string(),
            },
        )
        .unwrap();

        conn.execute("DELETE FROM runs WHERE id = ?", params![run_id]).unwrap();
        let remaining = list_recent_discoveries(&conn, 10).unwrap();
        assert!(remaining.is_empty());
    }
}
