//! CLI integration tests: run the automock binary.
//! Uses CARGO_BIN_EXE_automock when set (e.g. by `cargo test`).

use std::io::Write;
use std::process::Command;

fn bin() -> Option<std::path::PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_automock").map(std::path::PathBuf::from)
}

#[test]
fn test_cli_help_succeeds() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin).arg("--help").output().expect("run --help");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("automock"));
    assert!(stdout.contains("resolve"));
}

#[test]
fn test_cli_tree_text() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .args(["tree", "--subject", "ApplicationCore"])
        .output()
        .expect("run tree");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Dependency tree (8 nodes, depth 2)"));
    assert!(stdout.contains("  dyn IDataProcessor [leaf-interface]"));
    assert!(stdout.contains("    Vec<String> [leaf-empty-constructible]"));
}

#[test]
fn test_cli_resolve_json_with_script() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .args(["resolve", "--subject", "Orchestrator", "--format", "json", "--script"])
        .output()
        .expect("run resolve");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(report["record_count"], 3);
    assert_eq!(report["mocked"][0], "dyn IDataSource");
    assert_eq!(report["records"][0]["strategy"], "leaf_interface");
    assert_eq!(report["script"].as_array().map(|a| a.len()), Some(3));
}

#[test]
fn test_cli_cyclic_subject_fails() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .args(["resolve", "--subject", "CyclicA", "--max-nodes", "10"])
        .output()
        .expect("run resolve");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeded 10 nodes"));
}

#[test]
fn test_cli_cyclic_subject_with_huge_ceiling_fails_cleanly() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .args(["tree", "--subject", "CyclicA", "--max-nodes", "100000"])
        .output()
        .expect("run tree");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeded 100000 nodes"));
}

#[test]
fn test_cli_reads_config_file() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, r#"{{"max_nodes": 3}}"#).unwrap();
    let out = Command::new(bin)
        .args(["tree", "--subject", "SystemOrchestrator", "--config"])
        .arg(config.path())
        .output()
        .expect("run tree");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeded 3 nodes"));
}

#[test]
fn test_cli_classify_json() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .args(["classify", "--format", "json"])
        .output()
        .expect("run classify");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    let items = report["items"].as_array().expect("items");
    let settings = items
        .iter()
        .find(|i| i["short_name"] == "ConnectionSettings")
        .expect("ConnectionSettings classified");
    assert_eq!(settings["strategy"], "leaf_primitive_constructible");
    assert_eq!(settings["kind"], "class");
}
