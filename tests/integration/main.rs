//! Integration tests for Archmap
//!
//! These tests drive the library crates and the CLI binary end to end.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use archmap_core::test_utils::{sample_docs, sample_registry};
use archmap_core::{EdgeType, ROOT_FOLDER_ID, build_graph, load_graph, save_graph};
use archmap_query::{Depth, MatchOutcome, QueryEngine};
use serde_json::Value;
use tempfile::TempDir;

fn archmap(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_archmap"))
        .arg("--root")
        .arg(root)
        .args(args)
        .current_dir(root)
        .env_remove("ARCHMAP_GRAPH")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute archmap")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "archmap failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn write_inputs(dir: &Path) {
    fs::write(
        dir.join("registry.json"),
        serde_json::to_string(&sample_registry()).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("docs.json"),
        serde_json::to_string(&sample_docs()).unwrap(),
    )
    .unwrap();
}

/// Build, persist, reload and query without going through the CLI.
#[test]
fn test_build_store_query_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let graph = build_graph(&sample_registry(), &sample_docs(), ".");
    save_graph(&graph, temp_dir.path()).unwrap();

    let loaded = load_graph(temp_dir.path()).unwrap().unwrap();
    assert_eq!(loaded, graph);
    assert!(loaded.validate().is_clean());

    let engine = QueryEngine::new(&loaded);
    let context = engine.context(Some("src/api"), Depth::Limited(0)).unwrap();
    assert_eq!(context.start.id, "api");
    let docs: Vec<&str> = context.docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(docs, vec!["docs/api-rules.md", "docs/architecture.md"]);

    assert!(matches!(
        engine.best_match("zzz_nonexistent"),
        MatchOutcome::NotFound { .. }
    ));
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_archmap"))
        .arg("--help")
        .output()
        .expect("Failed to execute archmap");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("archmap"));
    assert!(stdout.contains("Architecture knowledge graph"));
}

#[test]
fn test_cli_build_and_query() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_inputs(root);

    let metadata = stdout_json(&archmap(
        root,
        &["build", "--registry", "registry.json", "--docs", "docs.json", "--base", "."],
    ));
    assert_eq!(metadata["stats"]["folderCount"], 6);
    assert_eq!(metadata["stats"]["edgeCount"], 24);
    assert!(root.join(".archmap").join("graph.json").exists());

    let resolved = stdout_json(&archmap(root, &["resolve", "src/api/handlers/admin.ts"]));
    assert_eq!(resolved["status"], "found");
    assert_eq!(resolved["method"], "nearest-parent");
    assert_eq!(resolved["node"]["id"], "handlers");

    let unknown = stdout_json(&archmap(root, &["resolve", "elsewhere/file.ts"]));
    assert_eq!(unknown["status"], "not-found");
    assert_eq!(unknown["query"], "elsewhere/file.ts");
    assert_eq!(unknown["suggestion"], archmap_query::NOT_FOUND_SUGGESTION);

    let context = stdout_json(&archmap(root, &["context", "api", "--depth", "0"]));
    assert_eq!(context["nodes"], Value::Array(vec![]));
    assert_eq!(context["constraints"][0]["id"], "docs/api-rules.md");

    let tree = stdout_json(&archmap(root, &["tree"]));
    assert_eq!(tree["root"], ROOT_FOLDER_ID);
    assert_eq!(tree["folders"].as_array().unwrap().len(), 6);

    let best = stdout_json(&archmap(root, &["match", "router"]));
    assert_eq!(best["status"], "found");
    assert_eq!(best["node"]["id"], "router");

    let missing = stdout_json(&archmap(root, &["match", "zzz_nonexistent"]));
    assert_eq!(missing["status"], "not-found");

    let hits = stdout_json(&archmap(root, &["search", "hndlr", "--limit", "2"]));
    assert!(hits.as_array().unwrap().len() <= 2);

    let report = stdout_json(&archmap(root, &["validate"]));
    assert_eq!(report["missingRoot"], false);
    assert_eq!(report["danglingEdges"], Value::Array(vec![]));
}

#[test]
fn test_cli_errors() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    // Nothing built yet.
    let output = archmap(root, &["context", "api"]);
    assert!(!output.status.success());

    write_inputs(root);
    stdout_json(&archmap(root, &["build", "--registry", "registry.json", "--docs", "docs.json"]));

    let output = archmap(root, &["context", "api", "--depth", "deep"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("deep"));

    let output = archmap(root, &["tree", "router"]);
    assert!(!output.status.success());

    let output = archmap(root, &["clear"]);
    assert!(output.status.success());
    assert!(!root.join(".archmap").exists());
}

#[test]
fn test_cli_respects_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_inputs(root);
    fs::write(
        root.join("archmap.toml"),
        "graph_path = \"out/graph.json\"\ndefault_depth = 1\n",
    )
    .unwrap();

    stdout_json(&archmap(root, &["build", "--registry", "registry.json", "--docs", "docs.json"]));
    assert!(root.join("out").join("graph.json").exists());
    assert!(!root.join(".archmap").exists());

    let context = stdout_json(&archmap(root, &["context"]));
    let depths: Vec<u64> = context["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["depth"].as_u64().unwrap())
        .collect();
    assert_eq!(depths, vec![1, 1]);
}

/// Absolute registry paths under the working directory become relative
/// with no `--root` or `--base`.
#[test]
fn test_cli_default_base_makes_absolute_paths_portable() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    let absolute = |rel: &str| root.join(rel).display().to_string();

    let registry = serde_json::json!({
        "folders": {
            "api": { "desc": "API layer", "resolvedPath": absolute("src/api"), "pathExists": true }
        },
        "modules": {
            "h": { "desc": "Handler", "resolvedPath": absolute("src/api/h.ts"), "pathExists": true }
        }
    });
    fs::write(root.join("registry.json"), registry.to_string()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_archmap"))
        .args(["build", "--registry", "registry.json"])
        .current_dir(&root)
        .env_remove("ARCHMAP_GRAPH")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute archmap");
    let metadata = stdout_json(&output);
    assert_eq!(metadata["rootPath"], root.display().to_string());

    let graph = load_graph(&root).unwrap().unwrap();
    assert_eq!(
        graph.nodes.folders["api"].resolved_path.as_deref(),
        Some("src/api")
    );
    let edges: Vec<(&str, &str, EdgeType)> = graph
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.kind))
        .collect();
    assert_eq!(
        edges,
        vec![
            (ROOT_FOLDER_ID, "api", EdgeType::Contains),
            ("h", "api", EdgeType::BelongsTo),
        ]
    );
}
