//! End-to-end tests for the MKG CLI.
//!
//! Tests invoke the `mkg` binary as a subprocess against a temporary
//! vault and verify JSON output.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn mkg(vault: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mkg"));
    cmd.arg("--vault").arg(vault);
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn sample_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("knowledge")).unwrap();
    fs::create_dir_all(dir.path().join("private")).unwrap();
    // Both Index files carry the same link set so assertions never
    // depend on which one the unordered scan indexes last.
    fs::write(dir.path().join("Index.md"), "start at [[Rust]]").unwrap();
    fs::write(
        dir.path().join("private").join("Index.md"),
        "shadowed copy of [[Rust]]",
    )
    .unwrap();
    fs::write(
        dir.path().join("knowledge").join("Rust.md"),
        "---\ntags: [language]\n---\nRust links [[Tokio]] and [[Index]].\n",
    )
    .unwrap();
    fs::write(dir.path().join("knowledge").join("Tokio.md"), "runtime").unwrap();
    dir
}

#[test]
fn e2e_resolve_prefers_root_path() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).args(["resolve", "Index"]));
    assert_eq!(value, serde_json::json!("Index"));
}

#[test]
fn e2e_resolve_unknown_is_null() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).args(["resolve", "Nope"]));
    assert!(value.is_null());
}

#[test]
fn e2e_paths_lists_duplicates() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).args(["paths", "Index"]));
    let mut paths: Vec<String> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["Index", "private/Index"]);
}

#[test]
fn e2e_links_and_backlinks() {
    let dir = sample_vault();
    let links = json_output(mkg(dir.path()).args(["links", "Rust"]));
    assert_eq!(links, serde_json::json!(["Index", "Tokio"]));

    let backlinks = json_output(mkg(dir.path()).args(["backlinks", "Tokio"]));
    assert_eq!(backlinks, serde_json::json!(["Rust"]));
}

#[test]
fn e2e_graph_annotates_distance_and_direction() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).args(["graph", "Tokio", "--depth", "2"]));
    let rust = &value["Rust"];
    assert_eq!(rust["distance"], 1);
    assert_eq!(rust["direction"], "backward");
}

#[test]
fn e2e_show_prints_frontmatter_and_body() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).args(["show", "Rust"]));
    assert_eq!(value["path"], "knowledge/Rust");
    assert_eq!(value["frontmatter"]["tags"][0], "language");
    assert!(value["body"].as_str().unwrap().contains("[[Tokio]]"));
}

#[test]
fn e2e_stats_counts_notes_and_links() {
    let dir = sample_vault();
    let value = json_output(mkg(dir.path()).arg("stats"));
    // 4 files, 3 distinct names (Index is duplicated).
    assert_eq!(value["notes"], 3);
    assert_eq!(value["paths"], 4);
    assert_eq!(value["links"], 3);
}
