//! Black-box coverage for the hidden `specx realize-exact` worker
//! invocation, run as a genuine child process the way
//! `job::realize_backtracking_with_timeout` actually spawns it.

use std::process::Command;

#[test]
fn graphical_sequence_prints_edges_and_succeeds() {
    let output = Command::new(env!("CARGO_BIN_EXE_specx"))
        .args(["realize-exact", "--degrees", "3,3,3,3", "--seed", "1"])
        .output()
        .expect("spawn specx realize-exact");
    assert!(output.status.success());
    let edges: Vec<(u32, u32)> =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON edge list");
    assert_eq!(edges.len(), 6);
}

#[test]
fn non_graphical_sequence_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_specx"))
        .args(["realize-exact", "--degrees", "3,3,1", "--seed", "1"])
        .output()
        .expect("spawn specx realize-exact");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
