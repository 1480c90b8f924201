//! New-record and metric-anomaly detection (C13) over persisted Runs.

use rusqlite::{params, Connection};
use specx_core::errors::SpecxError;

use crate::schema::{self, NewDiscovery};

/// Threshold multipliers for [`anomaly_flags`], matching the corpus's
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyThresholds {
    /// Numerical tolerance for "is this actually better" comparisons.
    pub eps: f64,
    /// Triangle-count ratio: below `median * tri_ratio` is LOW, above
    /// `median / tri_ratio` is HIGH.
    pub tri_ratio: f64,
    /// Average-path-length ratio: above `median * apl_ratio` is HIGH,
    /// below `median / apl_ratio` is LOW.
    pub apl_ratio: f64,
    /// Clustering-coefficient ratio: below `median * cl_ratio` is LOW,
    /// above `median / cl_ratio` is HIGH.
    pub cl_ratio: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        AnomalyThresholds {
            eps: 1e-6,
            tri_ratio: 0.5,
            apl_ratio: 1.25,
            cl_ratio: 0.7,
        }
    }
}

/// Median-like baselines for `triangles`/`avg_path_len`/`clustering`,
/// computed from the `greedy`/`exact_realization` runs for a degree class.
///
/// Uses the "upper median" convention: for an even-length sorted sample,
/// the element at `len / 2` is taken rather than interpolating between the
/// two central elements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaselineStats {
    /// Upper-median triangle count, if any baseline runs recorded one.
    pub tri_median: Option<f64>,
    /// Upper-median average path length, if any baseline runs recorded one.
    pub apl_median: Option<f64>,
    /// Upper-median clustering coefficient, if any baseline runs recorded
    /// one.
    pub cl_median: Option<f64>,
}

fn upper_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Some(values[values.len() / 2])
}

/// Computes [`BaselineStats`] from the `greedy`/`exact_realization` Runs
/// recorded for `degrees_hash`.
pub fn baseline_stats(conn: &Connection, degrees_hash: &str) -> Result<BaselineStats, SpecxError> {
    let runs = schema::load_runs_by_fingerprint(conn, degrees_hash, Some(&["greedy", "exact_realization"]))?;

    let tri: Vec<f64> = runs.iter().filter_map(|r| r.triangles).map(|t| t as f64).collect();
    let apl: Vec<f64> = runs.iter().filter_map(|r| r.avg_path_len).collect();
    let cl: Vec<f64> = runs.iter().filter_map(|r| r.clustering).collect();

    Ok(BaselineStats {
        tri_median: upper_median(tri),
        apl_median: upper_median(apl),
        cl_median: upper_median(cl),
    })
}

/// Returns `true` when `new_val` is a significant improvement over
/// `old_val` under `mode`, beyond `eps` numerical tolerance.
fn is_better(new_val: f64, old_val: f64, mode: &str, eps: f64) -> bool {
    if mode == "min" {
        new_val < old_val - eps
    } else {
        new_val > old_val + eps
    }
}

/// Compares a run's metrics against `base` and returns the anomaly flags
/// that fired, in a fixed, deterministic order.
pub fn anomaly_flags(
    triangles: Option<i64>,
    avg_path_len: Option<f64>,
    clustering: Option<f64>,
    is_connected: Option<bool>,
    base: &BaselineStats,
    thresholds: &AnomalyThresholds,
) -> Vec<String> {
    let mut flags = Vec::new();

    if let (Some(t), Some(median)) = (triangles, base.tri_median) {
        let t = t as f64;
        if t < median * thresholds.tri_ratio {
            flags.push("LOW_TRIANGLES".to_string());
        }
        if t > median / thresholds.tri_ratio.max(1e-9) {
            flags.push("HIGH_TRIANGLES".to_string());
        }
    }

    if let (Some(a), Some(median)) = (avg_path_len, base.apl_median) {
        if a > median * thresholds.apl_ratio {
            flags.push("HIGH_APL".to_string());
        }
        if a < median / thresholds.apl_ratio.max(1e-9) {
            flags.push("LOW_APL".to_string());
        }
    }

    if let (Some(c), Some(median)) = (clustering, base.cl_median) {
        if c < median * thresholds.cl_ratio {
            flags.push("LOW_CLUSTERING".to_string());
        }
        if c > median / thresholds.cl_ratio.max(1e-9) {
            flags.push("HIGH_CLUSTERING".to_string());
        }
    }

    if is_connected == Some(false) {
        flags.push("DISCONNECTED".to_string());
    }

    flags
}

/// Attempts to record a [`schema::DiscoveryRecord`] for the current best
/// Run of a `(degrees_hash, mode)` class, inside a single transaction.
///
/// Mirrors the source's three-way outcome:
/// - no qualifying runs exist yet: returns `Ok(None)`;
/// - this is the first Discovery for the class: always recorded, noted
///   `"FIRST for this degrees_hash/mode."`;
/// - the new best is a significant improvement: recorded with
///   `improvement` set, noted `"NEW BEST"`;
/// - it isn't an improvement but at least two anomaly flags fired:
///   recorded with `improvement = Some(0.0)`, noted `"ANOMALY without new
///   record."`;
/// - otherwise: `Ok(None)`, nothing recorded.
pub fn try_create_discovery(
    conn: &mut Connection,
    degrees_hash: &str,
    mode: &str,
    thresholds: &AnomalyThresholds,
) -> Result<Option<i64>, SpecxError> {
    let tx = conn
        .transaction()
        .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?;

    let order = if mode == "min" { "objective_value ASC" } else { "objective_value DESC" };
    let sql = format!(
        "SELECT id, objective_name, objective_value, triangles, avg_path_len, clustering, is_connected
         FROM runs WHERE degrees_hash = ? AND objective_value IS NOT NULL
         ORDER BY {order}, time_ms ASC LIMIT 1"
    );
    let best: Option<(i64, String, f64, Option<i64>, Option<f64>, Option<f64>, Option<i64>)> = tx
        .query_row(&sql, params![degrees_hash], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })
        .ok();

    let Some((best_run_id, objective_name, new_val, triangles, avg_path_len, clustering, is_connected)) = best else {
        return Ok(None);
    };
    let is_connected = is_connected.map(|v| v != 0);

    let prev_val: Option<f64> = tx
        .query_row(
            "SELECT new_best_value FROM discoveries WHERE degrees_hash = ? AND mode = ? ORDER BY id DESC LIMIT 1",
            params![degrees_hash, mode],
            |row| row.get(0),
        )
        .ok();

    let base = {
        let tri: Vec<f64> = tx
            .prepare("SELECT triangles FROM runs WHERE degrees_hash = ? AND algorithm IN ('greedy','exact_realization') AND triangles IS NOT NULL")
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .query_map(params![degrees_hash], |row| row.get::<_, i64>(0))
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .into_iter()
            .map(|t| t as f64)
            .collect();
        let apl: Vec<f64> = tx
            .prepare("SELECT avg_path_len FROM runs WHERE degrees_hash = ? AND algorithm IN ('greedy','exact_realization') AND avg_path_len IS NOT NULL")
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .query_map(params![degrees_hash], |row| row.get::<_, f64>(0))
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?;
        let cl: Vec<f64> = tx
            .prepare("SELECT clustering FROM runs WHERE degrees_hash = ? AND algorithm IN ('greedy','exact_realization') AND clustering IS NOT NULL")
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .query_map(params![degrees_hash], |row| row.get::<_, f64>(0))
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?;
        BaselineStats {
            tri_median: upper_median(tri),
            apl_median: upper_median(apl),
            cl_median: upper_median(cl),
        }
    };

    let flags = anomaly_flags(triangles, avg_path_len, clustering, is_connected, &base, thresholds);

    let outcome = if let Some(prev) = prev_val {
        if is_better(new_val, prev, mode, thresholds.eps) {
            let improvement = if mode == "min" { prev - new_val } else { new_val - prev };
            Some(NewDiscovery {
                degrees_hash: degrees_hash.to_string(),
                mode: mode.to_string(),
                objective_name,
                best_run_id,
                prev_best_value: Some(prev),
                new_best_value: new_val,
                improvement: Some(improvement),
                anomaly_flags: flags.clone(),
                note: format!("NEW BEST + flags={flags:?}"),
            })
        } else if flags.len() >= 2 {
            Some(NewDiscovery {
                degrees_hash: degrees_hash.to_string(),
                mode: mode.to_string(),
                objective_name,
                best_run_id,
                prev_best_value: Some(prev),
                new_best_value: new_val,
                improvement: Some(0.0),
                anomaly_flags: flags.clone(),
                note: format!("ANOMALY without new record. flags={flags:?}"),
            })
        } else {
            None
        }
    } else {
        Some(NewDiscovery {
            degrees_hash: degrees_hash.to_string(),
            mode: mode.to_string(),
            objective_name,
            best_run_id,
            prev_best_value: None,
            new_best_value: new_val,
            improvement: None,
            anomaly_flags: flags.clone(),
            note: format!("FIRST for this degrees_hash/mode. flags={flags:?}"),
        })
    };

    let result = match outcome {
        Some(new_discovery) => Some(schema::insert_discovery(&tx, &new_discovery)?),
        None => None,
    };

    tx.commit().map_err(|err| SpecxError::store("specx_store.discovery", err.to_string()))?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{init_schema, NewRun};

    fn run_with_metrics(
        degrees_hash: &str,
        algorithm: &str,
        objective_value: f64,
        triangles: i64,
        avg_path_len: f64,
        clustering: f64,
        is_connected: bool,
    ) -> NewRun {
        NewRun {
            n: 10,
            k: Some(20),
            degrees: vec![2; 10],
            degrees_hash: degrees_hash.to_string(),
            algorithm: algorithm.to_string(),
            edges: vec![],
            graph6_b64: String::new(),
            canonical_g6_b64: String::new(),
            graph6_decoded: None,
            canonical_g6_decoded: None,
            time_ms: 1,
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
            triangles: Some(triangles),
            avg_path_len: Some(avg_path_len),
            clustering: Some(clustering),
            is_connected: Some(is_connected),
        }
    }

    #[test]
    fn first_discovery_is_always_recorded() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        schema::insert_run(&conn, &run_with_metrics("abc", "greedy", 2.5, 3, 2.0, 0.3, true)).unwrap();

        let id = try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default())
            .unwrap()
            .unwrap();
        let d = schema::latest_discovery(&conn, "abc", "min").unwrap().unwrap();
        assert_eq!(d.id, id);
        assert!(d.note.starts_with("FIRST"));
        assert_eq!(d.prev_best_value, None);
    }

    #[test]
    fn strict_improvement_is_a_new_best() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        schema::insert_run(&conn, &run_with_metrics("abc", "greedy", 3.0, 3, 2.0, 0.3, true)).unwrap();
        try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default()).unwrap();

        schema::insert_run(&conn, &run_with_metrics("abc", "hc", 1.0, 3, 2.0, 0.3, true)).unwrap();
        let id = try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default())
            .unwrap()
            .unwrap();
        let d = schema::latest_discovery(&conn, "abc", "min").unwrap().unwrap();
        assert_eq!(d.id, id);
        assert!(d.note.starts_with("NEW BEST"));
        assert_eq!(d.improvement, Some(2.0));
    }

    #[test]
    fn no_improvement_and_no_anomaly_records_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        schema::insert_run(&conn, &run_with_metrics("abc", "greedy", 2.0, 3, 2.0, 0.3, true)).unwrap();
        try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default()).unwrap();

        schema::insert_run(&conn, &run_with_metrics("abc", "hc", 2.0, 3, 2.0, 0.3, true)).unwrap();
        let result = try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn disconnected_result_with_other_anomaly_is_recorded_without_new_record() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        schema::insert_run(&conn, &run_with_metrics("abc", "greedy", 2.0, 10, 2.0, 0.5, true)).unwrap();
        try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default()).unwrap();

        // same objective value (no improvement), but disconnected and
        // triangle-starved relative to baseline -> two flags.
        schema::insert_run(&conn, &run_with_metrics("abc", "hc", 2.0, 0, 2.0, 0.5, false)).unwrap();
        let id = try_create_discovery(&mut conn, "abc", "min", &AnomalyThresholds::default())
            .unwrap()
            .unwrap();
        let d = schema::latest_discovery(&conn, "abc", "min").unwrap().unwrap();
        assert_eq!(d.id, id);
        assert!(d.note.starts_with("ANOMALY"));
        assert!(d.anomaly_flags.contains("DISCONNECTED"));
        assert!(d.anomaly_flags.contains("LOW_TRIANGLES"));
    }

    #[test]
    fn baseline_stats_use_upper_median() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        for t in [1, 2, 3, 4] {
            schema::insert_run(&conn, &run_with_metrics("abc", "greedy", 1.0, t, 2.0, 0.3, true)).unwrap();
        }
        let base = baseline_stats(&conn, "abc").unwrap();
        // sorted [1,2,3,4], upper median index len/2=2 -> value 3
        assert_eq!(base.tri_median, Some(3.0));
    }
}
