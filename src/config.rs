//! `archmap.toml` loading with environment overrides

use anyhow::Context;
use archmap_query::{Depth, DisplayMode, QueryOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "archmap.toml";

/// Overrides where the graph is read from and written to.
pub const GRAPH_ENV: &str = "ARCHMAP_GRAPH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph file, relative to the project root. Defaults to `.archmap/graph.json`.
    pub graph_path: Option<PathBuf>,
    pub default_depth: Depth,
    pub search_limit: usize,
    pub concise: bool,
}

impl Default for Config {
    fn default() -> Self {
        let options = QueryOptions::default();
        Config {
            graph_path: None,
            default_depth: Depth::default(),
            search_limit: options.search_limit,
            concise: false,
        }
    }
}

impl Config {
    /// Read `<root>/archmap.toml` if present, then apply environment overrides.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let mut config = Self::from_root(root)?;
        config.apply_graph_override(env::var(GRAPH_ENV).ok());
        Ok(config)
    }

    /// `<root>/archmap.toml` alone; defaults when the file is missing.
    pub fn from_root(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Value of `ARCHMAP_GRAPH`, when set, replaces the configured graph path.
    pub fn apply_graph_override(&mut self, graph: Option<String>) {
        if let Some(graph) = graph {
            tracing::debug!("{} overrides the graph path: {}", GRAPH_ENV, graph);
            self.graph_path = Some(PathBuf::from(graph));
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Explicit graph file, resolved against `root`.
    pub fn graph_file(&self, root: &Path) -> Option<PathBuf> {
        self.graph_path.as_ref().map(|p| root.join(p))
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            mode: if self.concise {
                DisplayMode::Concise
            } else {
                DisplayMode::Verbose
            },
            search_limit: self.search_limit,
        }
    }
}
