//! Structural checks for graphs that did not come straight from the builder

use serde::Serialize;
use tracing::warn;

use crate::graph::StructureGraph;
use crate::model::{Edge, KnowledgeGraph, ROOT_FOLDER_ID};

/// Problems found in a graph. Never fatal on its own; callers decide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub missing_root: bool,
    /// Edges with an endpoint absent from every dictionary.
    pub dangling_edges: Vec<Edge>,
    /// Folders with more than one incoming `contains` edge.
    pub multi_parent_folders: Vec<String>,
    pub contains_cycle: bool,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        !self.missing_root
            && self.dangling_edges.is_empty()
            && self.multi_parent_folders.is_empty()
            && !self.contains_cycle
    }
}

impl KnowledgeGraph {
    /// Check the invariants the builder guarantees for its own output.
    pub fn validate(&self) -> ValidationReport {
        let dangling_edges: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| !self.contains_id(&e.from) || !self.contains_id(&e.to))
            .cloned()
            .collect();

        let structure = StructureGraph::from_graph(self);
        let multi_parent_folders: Vec<String> = self
            .nodes
            .folders
            .keys()
            .filter(|id| structure.parent_folders(id).len() > 1)
            .cloned()
            .collect();

        let report = ValidationReport {
            missing_root: self.root().is_none(),
            dangling_edges,
            multi_parent_folders,
            contains_cycle: structure.has_contains_cycle(),
        };

        if report.missing_root {
            warn!("Graph has no `{}` folder", ROOT_FOLDER_ID);
        }
        if !report.dangling_edges.is_empty() {
            warn!("Graph has {} dangling edges", report.dangling_edges.len());
        }
        if report.contains_cycle {
            warn!("contains edges form a cycle");
        }
        report
    }
}
