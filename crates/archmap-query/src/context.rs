//! Breadth-first context collection around a resolved node

use std::collections::{HashSet, VecDeque};

use archmap_core::{DocNode, DocPriority, KnowledgeGraph, NodeRef, StructureGraph};
use serde::Serialize;

use crate::options::{Depth, DisplayMode, truncate};
use crate::references::ReferenceIndex;
use crate::resolver::ResolvedNode;

/// A node reached during traversal and its distance from the start.
#[derive(Debug, Clone, Serialize)]
pub struct VisitedNode<'g> {
    pub depth: usize,
    pub node: NodeRef<'g>,
}

/// What a caller sees of a document: no full content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSummary {
    pub id: String,
    pub priority: DocPriority,
    pub format: String,
    pub explains: String,
}

impl DocSummary {
    pub fn from_doc(doc: &DocNode, mode: DisplayMode) -> Self {
        DocSummary {
            id: doc.id.clone(),
            priority: doc.priority,
            format: doc.format.clone(),
            explains: truncate(&doc.explains, mode.description_limit()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResult<'g> {
    pub start: ResolvedNode<'g>,
    /// Containing folders of the start node, nearest first.
    pub trail: Vec<String>,
    /// Reached nodes, start excluded, in visit order.
    pub nodes: Vec<VisitedNode<'g>>,
    /// Referencing documents, constraint first.
    pub docs: Vec<DocSummary>,
    pub constraints: Vec<DocSummary>,
}

/// Raw result of a traversal before it is summarized.
#[derive(Debug, Default)]
pub struct Traversal<'g> {
    pub nodes: Vec<VisitedNode<'g>>,
    pub docs: Vec<&'g DocNode>,
}

/// Visit structural children from `start` up to `max_depth`, gathering the
/// documents that reference any visited node. Each node and each document
/// appears once.
pub fn traverse<'g>(
    graph: &'g KnowledgeGraph,
    structure: &StructureGraph,
    refs: &ReferenceIndex<'g>,
    start: NodeRef<'g>,
    max_depth: Depth,
) -> Traversal<'g> {
    let mut traversal = Traversal::default();
    let mut seen_nodes: HashSet<&'g str> = HashSet::from([start.id()]);
    let mut seen_docs: HashSet<&'g str> = HashSet::new();
    let mut queue = VecDeque::from([(start, 0usize)]);

    while let Some((node, depth)) = queue.pop_front() {
        for &doc in refs.referencing(node.id()) {
            if seen_docs.insert(doc.id.as_str()) {
                traversal.docs.push(doc);
            }
        }
        if depth > 0 {
            traversal.nodes.push(VisitedNode { depth, node });
        }
        if !max_depth.allows_expansion(depth) {
            continue;
        }
        for child in structure.children(node.id()) {
            let Some(child_node) = graph.node(child.kind, &child.id) else {
                continue;
            };
            if seen_nodes.insert(child_node.id()) {
                queue.push_back((child_node, depth + 1));
            }
        }
    }

    traversal.docs.sort_by_key(|doc| doc.priority);
    traversal
}

impl<'g> ContextResult<'g> {
    pub fn new(start: ResolvedNode<'g>, trail: Vec<String>, traversal: Traversal<'g>, mode: DisplayMode) -> Self {
        let docs: Vec<DocSummary> = traversal
            .docs
            .iter()
            .map(|doc| DocSummary::from_doc(doc, mode))
            .collect();
        let constraints = docs
            .iter()
            .filter(|doc| doc.priority == DocPriority::Constraint)
            .cloned()
            .collect();
        ContextResult {
            start,
            trail,
            nodes: traversal.nodes,
            docs,
            constraints,
        }
    }
}
