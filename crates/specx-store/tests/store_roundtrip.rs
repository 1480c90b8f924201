use rusqlite::Connection;
use specx_store::{
    anomaly_flags, best_run, init_schema, insert_discovery, insert_job, insert_run, list_recent_runs, load_job,
    load_runs_by_fingerprint, mark_job_done, mark_job_running, try_create_discovery, update_job_progress,
    AnomalyThresholds, BaselineStats, NewDiscovery, NewRun,
};
use tempfile::NamedTempFile;

fn sample_run(degrees_hash: &str, algorithm: &str, value: f64) -> NewRun {
    NewRun {
        n: 6,
        k: Some(9),
        degrees: vec![3, 3, 3, 3, 3, 3],
        degrees_hash: degrees_hash.to_string(),
        algorithm: algorithm.to_string(),
        edges: vec![[0, 1], [1, 2], [2, 3], [3, 4], [4, 5], [5, 0], [0, 3], [1, 4], [2, 5]],
        graph6_b64: "RU1i".to_string(),
        canonical_g6_b64: "RU1i".to_string(),
        graph6_decoded: Some("E]~o".to_string()),
        canonical_g6_decoded: Some("E]~o".to_string()),
        time_ms: 4,
        seed: Some(7),
        is_graphical: true,
        objective_name: "spectral_radius".to_string(),
        objective_mode: "min".to_string(),
        objective_value: Some(value),
        spectral_radius: Some(value),
        iterations: None,
        accepted_moves: None,
        meta_params: None,
        connected_only: true,
        triangles: Some(2),
        avg_path_len: Some(1.4),
        clustering: Some(0.4),
        is_connected: Some(true),
    }
}

#[test]
fn insert_load_and_query_runs_against_real_sqlite_file() {
    let db = NamedTempFile::new().expect("temp db");
    let conn = Connection::open(db.path()).expect("open");
    init_schema(&conn).expect("schema");

    insert_run(&conn, &sample_run("k33", "greedy", 3.0)).unwrap();
    let id2 = insert_run(&conn, &sample_run("k33", "hc", 2.6)).unwrap();

    let runs = load_runs_by_fingerprint(&conn, "k33", None).unwrap();
    assert_eq!(runs.len(), 2);

    let best = best_run(&conn, Some("k33"), None, None, "min").unwrap().unwrap();
    assert_eq!(best.id, id2);
    assert!((best.objective_value.unwrap() - 2.6).abs() < 1e-9);

    let recent = list_recent_runs(&conn, 10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, id2);
}

#[test]
fn job_lifecycle_transitions_persist() {
    let db = NamedTempFile::new().expect("temp db");
    let conn = Connection::open(db.path()).expect("open");
    init_schema(&conn).expect("schema");

    let job_id = insert_job(&conn, "{\"n\":10}", 100).unwrap();
    let job = load_job(&conn, job_id).unwrap().unwrap();
    assert_eq!(job.status, "queued");

    mark_job_running(&conn, job_id).unwrap();
    update_job_progress(&conn, job_id, 50, "halfway").unwrap();
    let job = load_job(&conn, job_id).unwrap().unwrap();
    assert_eq!(job.status, "running");
    assert_eq!(job.progress_done, 50);
    assert!(job.started_at.is_some());

    mark_job_done(&conn, job_id).unwrap();
    let job = load_job(&conn, job_id).unwrap().unwrap();
    assert_eq!(job.status, "done");
    assert!(job.finished_at.is_some());
}

#[test]
fn discovery_detector_records_first_then_new_best_across_a_real_database() {
    let db = NamedTempFile::new().expect("temp db");
    let mut conn = Connection::open(db.path()).expect("open");
    init_schema(&conn).expect("schema");

    insert_run(&conn, &sample_run("k33", "greedy", 3.0)).unwrap();
    let first = try_create_discovery(&mut conn, "k33", "min", &AnomalyThresholds::default())
        .unwrap()
        .unwrap();
    assert!(first > 0);

    insert_run(&conn, &sample_run("k33", "sa", 2.1)).unwrap();
    let second = try_create_discovery(&mut conn, "k33", "min", &AnomalyThresholds::default())
        .unwrap()
        .unwrap();
    assert_ne!(first, second);
}

#[test]
fn anomaly_flags_fire_against_explicit_baselines() {
    let base = BaselineStats {
        tri_median: Some(10.0),
        apl_median: Some(2.0),
        cl_median: Some(0.5),
    };
    let thresholds = AnomalyThresholds::default();

    let flags = anomaly_flags(Some(1), Some(2.0), Some(0.5), Some(true), &base, &thresholds);
    assert!(flags.contains(&"LOW_TRIANGLES".to_string()));

    let flags = anomaly_flags(Some(10), Some(2.0), Some(0.5), Some(false), &base, &thresholds);
    assert!(flags.contains(&"DISCONNECTED".to_string()));
    assert!(!flags.contains(&"LOW_TRIANGLES".to_string()));
}

#[test]
fn manual_discovery_insert_round_trips_anomaly_flags() {
    let db = NamedTempFile::new().expect("temp db");
    let conn = Connection::open(db.path()).expect("open");
    init_schema(&conn).expect("schema");
    let run_id = insert_run(&conn, &sample_run("k33", "greedy", 3.0)).unwrap();

    insert_discovery(
        &conn,
        &NewDiscovery {
            degrees_hash: "k33".to_string(),
            mode: "min".to_string(),
            objective_name: "spectral_radius".to_string(),
            best_run_id: run_id,
            prev_best_value: None,
            new_best_value: 3.0,
            improvement: None,
            anomaly_flags: vec!["DISCONNECTED".to_string()],
            note: "FIRST for this degrees_hash/mode.".to_string(),
        },
    )
    .unwrap();

    let discoveries = specx_store::list_recent_discoveries(&conn, 5).unwrap();
    assert_eq!(discoveries.len(), 1);
    assert_eq!(discoveries[0].anomaly_flags, "[\"DISCONNECTED\"]");
}
