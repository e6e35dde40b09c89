//! Structural view over a knowledge graph using petgraph::StableDiGraph
//!
//! Only `contains` and `belongs-to` edges are indexed. Both are stored
//! parent → child, so `belongs-to` edges are reversed on the way in.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use tracing::debug;

use crate::model::{EdgeType, KnowledgeGraph, NodeKind};

/// A node of the structural view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureNode {
    pub kind: NodeKind,
    pub id: String,
}

/// Parent → child index keyed by node ID.
pub struct StructureGraph {
    inner: StableDiGraph<StructureNode, EdgeType>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for StructureGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl StructureGraph {
    /// Index every node and every structural edge of `graph`.
    ///
    /// IDs shared by two categories map to the higher-priority one. Edges whose
    /// endpoints are missing are skipped.
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        let mut inner = StableDiGraph::new();
        let mut index = HashMap::new();

        for node in graph.nodes() {
            index.entry(node.id().to_string()).or_insert_with(|| {
                inner.add_node(StructureNode {
                    kind: node.kind(),
                    id: node.id().to_string(),
                })
            });
        }

        let mut skipped = 0usize;
        for edge in &graph.edges {
            let (parent, child) = match edge.kind {
                EdgeType::Contains => (&edge.from, &edge.to),
                EdgeType::BelongsTo => (&edge.to, &edge.from),
                EdgeType::References | EdgeType::RelatedTo => continue,
            };
            match (index.get(parent.as_str()), index.get(child.as_str())) {
                (Some(&p), Some(&c)) => {
                    inner.add_edge(p, c, edge.kind);
                }
                _ => {
                    skipped += 1;
                    debug!("Skipping dangling {:?} edge {} -> {}", edge.kind, edge.from, edge.to);
                }
            }
        }
        if skipped > 0 {
            debug!("Skipped {} dangling structural edges", skipped);
        }

        StructureGraph { inner, index }
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn get(&self, id: &str) -> Option<&StructureNode> {
        self.index
            .get(id)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// Structural children of `id`: contained folders plus modules and
    /// exports that belong to it. Sorted by kind, then ID.
    pub fn children(&self, id: &str) -> Vec<&StructureNode> {
        self.children_where(id, |_| true)
    }

    /// Folders directly contained in `id`, sorted by ID.
    pub fn child_folders(&self, id: &str) -> Vec<&StructureNode> {
        self.children_where(id, |kind| kind == EdgeType::Contains)
    }

    fn children_where(&self, id: &str, keep: impl Fn(EdgeType) -> bool) -> Vec<&StructureNode> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<&StructureNode> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| keep(*e.weight()))
            .filter_map(|e| self.inner.node_weight(e.target()))
            .collect();
        children.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));
        children.dedup();
        children
    }

    /// Folders that directly contain `id`. More than one means the forest
    /// invariant is broken.
    pub fn parent_folders(&self, id: &str) -> Vec<&StructureNode> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeType::Contains)
            .filter_map(|e| self.inner.node_weight(e.source()))
            .collect()
    }

    /// The module or folder `id` belongs to. Folders have no owner.
    pub fn owner(&self, id: &str) -> Option<&StructureNode> {
        let &idx = self.index.get(id)?;
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeType::BelongsTo)
            .filter_map(|e| self.inner.node_weight(e.source()))
            .min_by(|a, b| a.id.cmp(&b.id))
    }

    /// IDs of the folders containing `id`, nearest first. Modules and
    /// exports climb through their owners to the first folder.
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::new();
        let mut current = id.to_string();
        seen.insert(current.clone());

        while let Some(parent) = self
            .parent_folders(&current)
            .into_iter()
            .min_by(|a, b| a.id.cmp(&b.id))
            .or_else(|| self.owner(&current))
        {
            if !seen.insert(parent.id.clone()) {
                break;
            }
            if parent.kind == NodeKind::Folder {
                ancestors.push(parent.id.clone());
            }
            current = parent.id.clone();
        }

        ancestors
    }

    /// Whether `contains` edges alone form a cycle.
    pub fn has_contains_cycle(&self) -> bool {
        let mut folders = petgraph::graph::DiGraph::<(), ()>::new();
        let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        for edge in self.inner.edge_references() {
            if *edge.weight() != EdgeType::Contains {
                continue;
            }
            let from = *remap
                .entry(edge.source())
                .or_insert_with(|| folders.add_node(()));
            let to = *remap
                .entry(edge.target())
                .or_insert_with(|| folders.add_node(()));
            folders.add_edge(from, to, ());
        }
        petgraph::algo::is_cyclic_directed(&folders)
    }
}
