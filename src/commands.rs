//! CLI command implementations

use anyhow::{Context, bail};
use archmap_core::{DocumentationUnit, KnowledgeGraph, VocabularyRegistry};
use archmap_query::{Depth, NOT_FOUND_SUGGESTION, QueryEngine};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load(root: &Path, config: &Config) -> anyhow::Result<KnowledgeGraph> {
    let graph = match config.graph_file(root) {
        Some(path) => archmap_core::read_graph(&path)
            .with_context(|| format!("Failed to load graph from {}", path.display()))?,
        None => match archmap_core::load_graph(root)? {
            Some(graph) => graph,
            None => bail!(
                "No graph stored under {}; run `archmap build` first",
                archmap_core::store_dir(root).display()
            ),
        },
    };
    tracing::debug!("Loaded graph with {} nodes", graph.node_count());
    Ok(graph)
}

fn depth_or_default(depth: Option<&str>, config: &Config) -> anyhow::Result<Depth> {
    match depth {
        Some(text) => Ok(text.parse()?),
        None => Ok(config.default_depth),
    }
}

pub fn build(
    root: &Path,
    config: &Config,
    registry: &Path,
    docs: Option<&Path>,
    base: Option<String>,
) -> anyhow::Result<()> {
    tracing::info!("Building graph from {}", registry.display());

    let registry: VocabularyRegistry = read_json(registry)?;
    let docs: Vec<DocumentationUnit> = match docs {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    // Absolute so absolute input paths under it become portable.
    let base_dir = match base {
        Some(base) => PathBuf::from(base),
        None => root.to_path_buf(),
    };
    let base = std::path::absolute(&base_dir)
        .with_context(|| format!("Failed to resolve base directory {}", base_dir.display()))?
        .display()
        .to_string();
    tracing::debug!("Base directory: {}", base);

    let graph = archmap_core::build_graph(&registry, &docs, &base);
    let written: PathBuf = match config.graph_file(root) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            archmap_core::write_graph(&graph, &path)?;
            path
        }
        None => archmap_core::save_graph(&graph, root)?,
    };

    tracing::info!("Graph written to {}", written.display());
    print_json(&graph.metadata)
}

pub fn resolve(root: &Path, config: &Config, identifier: &str) -> anyhow::Result<()> {
    let graph = load(root, config)?;
    let engine = QueryEngine::with_options(&graph, config.query_options());
    match engine.resolve(identifier) {
        Some(resolved) => print_json(&serde_json::json!({
            "status": "found",
            "method": resolved.method,
            "node": resolved.node,
        })),
        None => {
            tracing::info!("Nothing matches `{}`", identifier);
            print_json(&serde_json::json!({
                "status": "not-found",
                "query": identifier,
                "suggestion": NOT_FOUND_SUGGESTION,
            }))
        }
    }
}

pub fn search(root: &Path, config: &Config, query: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let graph = load(root, config)?;
    let engine = QueryEngine::with_options(&graph, config.query_options());
    let hits = match limit {
        Some(limit) => engine.search_with_limit(query, limit),
        None => engine.search(query),
    };
    print_json(&hits)
}

pub fn best_match(root: &Path, config: &Config, query: &str) -> anyhow::Result<()> {
    let graph = load(root, config)?;
    let engine = QueryEngine::with_options(&graph, config.query_options());
    print_json(&engine.best_match(query))
}

pub fn context(
    root: &Path,
    config: &Config,
    identifier: Option<&str>,
    depth: Option<&str>,
) -> anyhow::Result<()> {
    let depth = depth_or_default(depth, config)?;
    let graph = load(root, config)?;
    let engine = QueryEngine::with_options(&graph, config.query_options());
    print_json(&engine.context(identifier, depth)?)
}

pub fn tree(
    root: &Path,
    config: &Config,
    identifier: Option<&str>,
    depth: Option<&str>,
) -> anyhow::Result<()> {
    let depth = match depth {
        Some(text) => text.parse::<Depth>()?,
        None => Depth::Unlimited,
    };
    let graph = load(root, config)?;
    let engine = QueryEngine::with_options(&graph, config.query_options());
    print_json(&engine.list_hierarchy(identifier, depth)?)
}

pub fn validate(root: &Path, config: &Config) -> anyhow::Result<()> {
    let graph = load(root, config)?;
    let report = graph.validate();
    if report.is_clean() {
        tracing::info!("Graph is structurally sound");
    }
    print_json(&report)
}

pub fn clear(root: &Path) -> anyhow::Result<()> {
    tracing::info!("Clearing store for: {}", root.display());

    archmap_core::clear_store(root)?;

    tracing::info!("Store cleared");
    Ok(())
}
