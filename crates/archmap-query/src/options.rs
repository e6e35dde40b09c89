//! Knobs passed explicitly into every query

use std::fmt;
use std::str::FromStr;

use archmap_core::ArchmapError;
use serde::{Deserialize, Serialize};

/// Below this confidence a best match comes with alternatives.
pub const LOW_CONFIDENCE: f64 = 0.7;

/// Maximum number of runner-ups offered next to a weak match.
pub const ALTERNATIVE_LIMIT: usize = 5;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Only changes how much text is kept in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Concise,
    #[default]
    Verbose,
}

impl DisplayMode {
    pub fn description_limit(self) -> usize {
        match self {
            DisplayMode::Concise => 60,
            DisplayMode::Verbose => 160,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub mode: DisplayMode,
    pub search_limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            mode: DisplayMode::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// How far a traversal may expand from its start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DepthRepr", into = "DepthRepr")]
pub enum Depth {
    Limited(usize),
    Unlimited,
}

impl Depth {
    /// Whether a node found at `depth` may have its children visited.
    pub fn allows_expansion(self, depth: usize) -> bool {
        match self {
            Depth::Limited(max) => depth < max,
            Depth::Unlimited => true,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Limited(2)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Limited(n) => write!(f, "{}", n),
            Depth::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl FromStr for Depth {
    type Err = ArchmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "unlimited" | "-1" => Ok(Depth::Unlimited),
            other => other
                .parse::<usize>()
                .map(Depth::Limited)
                .map_err(|_| ArchmapError::InvalidDepth(s.to_string())),
        }
    }
}

/// Depth as written in config files: a number or a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<DepthRepr> for Depth {
    type Error = ArchmapError;

    fn try_from(repr: DepthRepr) -> Result<Self, Self::Error> {
        match repr {
            DepthRepr::Number(-1) => Ok(Depth::Unlimited),
            DepthRepr::Number(n) => usize::try_from(n)
                .map(Depth::Limited)
                .map_err(|_| ArchmapError::InvalidDepth(n.to_string())),
            DepthRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Depth> for DepthRepr {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Limited(n) => DepthRepr::Number(n as i64),
            Depth::Unlimited => DepthRepr::Text("unlimited".to_string()),
        }
    }
}

/// Cut `text` to at most `limit` characters, marking the cut with `…`.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
