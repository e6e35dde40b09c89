//! On-disk store for built graphs

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::KnowledgeGraph;

/// Store directory: .archmap/
pub const STORE_DIR: &str = ".archmap";

/// Serialized graph file
pub const GRAPH_FILE: &str = "graph.json";

/// Get store directory path
pub fn store_dir(root: &Path) -> PathBuf {
    root.join(STORE_DIR)
}

/// Get graph file path
pub fn graph_path(root: &Path) -> PathBuf {
    root.join(STORE_DIR).join(GRAPH_FILE)
}

/// Ensure store directory exists
pub fn ensure_store_dir(root: &Path) -> std::io::Result<()> {
    let dir = store_dir(root);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Serialize the graph to `.archmap/graph.json`, replacing any previous build.
pub fn save_graph(graph: &KnowledgeGraph, root: &Path) -> Result<PathBuf> {
    ensure_store_dir(root)?;
    let path = graph_path(root);
    write_graph(graph, &path)?;
    Ok(path)
}

/// Serialize the graph to an explicit file.
pub fn write_graph(graph: &KnowledgeGraph, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)?;
    std::fs::write(path, json)?;
    tracing::debug!("Graph saved: {}", path.display());
    Ok(())
}

/// Load the stored graph, if one has been built.
pub fn load_graph(root: &Path) -> Result<Option<KnowledgeGraph>> {
    let path = graph_path(root);
    if !path.exists() {
        return Ok(None);
    }
    read_graph(&path).map(Some)
}

/// Deserialize a graph from an explicit file.
pub fn read_graph(path: &Path) -> Result<KnowledgeGraph> {
    let json = std::fs::read_to_string(path)?;
    let graph: KnowledgeGraph = serde_json::from_str(&json)?;
    tracing::debug!(
        "Graph loaded from {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Clear store directory
pub fn clear_store(root: &Path) -> std::io::Result<()> {
    let dir = store_dir(root);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    Ok(())
}
