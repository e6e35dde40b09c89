//! Identifier → node resolution
//!
//! Three passes, first hit wins: exact ID, exact path, then the deepest
//! folder that contains the path.

use archmap_core::paths;
use archmap_core::{KnowledgeGraph, NodeKind, NodeRef, ROOT_FOLDER_ID, ROOT_PATH};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveMethod {
    ById,
    ByPath,
    NearestParent,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode<'g> {
    pub id: &'g str,
    pub kind: NodeKind,
    pub method: ResolveMethod,
    #[serde(skip)]
    pub node: NodeRef<'g>,
}

impl<'g> ResolvedNode<'g> {
    fn new(node: NodeRef<'g>, method: ResolveMethod) -> Self {
        ResolvedNode {
            id: node.id(),
            kind: node.kind(),
            method,
            node,
        }
    }
}

/// Map a user-supplied ID or path onto a node.
pub fn resolve<'g>(graph: &'g KnowledgeGraph, identifier: &str) -> Option<ResolvedNode<'g>> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(node) = graph.find(trimmed) {
        return Some(ResolvedNode::new(node, ResolveMethod::ById));
    }

    let wanted = paths::normalize_identifier(trimmed);
    if let Some(node) = by_path(graph, &wanted) {
        return Some(ResolvedNode::new(node, ResolveMethod::ByPath));
    }

    let parent = nearest_parent(graph, &wanted);
    if parent.is_none() {
        debug!("`{}` did not resolve to any node", identifier);
    }
    parent.map(|node| ResolvedNode::new(node, ResolveMethod::NearestParent))
}

fn path_matches(candidate: Option<&str>, wanted: &str) -> bool {
    candidate.is_some_and(|p| paths::normalize_identifier(p) == wanted)
}

/// Folders by declared then resolved path, then modules, exports and docs.
fn by_path<'g>(graph: &'g KnowledgeGraph, wanted: &str) -> Option<NodeRef<'g>> {
    let nodes = &graph.nodes;
    nodes
        .folders
        .values()
        .find(|f| path_matches(f.path.as_deref(), wanted))
        .or_else(|| {
            nodes
                .folders
                .values()
                .find(|f| path_matches(f.resolved_path.as_deref(), wanted))
        })
        .map(NodeRef::Folder)
        .or_else(|| {
            nodes
                .modules
                .values()
                .find(|m| path_matches(m.resolved_path.as_deref(), wanted))
                .map(NodeRef::Module)
        })
        .or_else(|| {
            nodes
                .exports
                .values()
                .find(|e| path_matches(e.resolved_path.as_deref(), wanted))
                .map(NodeRef::Export)
        })
        .or_else(|| {
            nodes
                .docs
                .values()
                .find(|d| path_matches(Some(&d.file_path), wanted))
                .map(NodeRef::Doc)
        })
}

/// Deepest folder whose location contains `wanted`. The root only answers
/// for `.` itself; ties go to the smallest ID.
fn nearest_parent<'g>(graph: &'g KnowledgeGraph, wanted: &str) -> Option<NodeRef<'g>> {
    if wanted == ROOT_PATH {
        return graph.root().map(NodeRef::Folder);
    }
    graph
        .nodes
        .folders
        .values()
        .filter(|f| f.id != ROOT_FOLDER_ID)
        .filter_map(|f| {
            let location = paths::normalize_identifier(f.location()?);
            paths::is_within(&location, wanted).then(|| (paths::segments(&location).len(), f))
        })
        .fold(None, |best: Option<(usize, _)>, candidate| match best {
            Some(current) if current.0 >= candidate.0 => Some(current),
            _ => Some(candidate),
        })
        .map(|(_, folder)| NodeRef::Folder(folder))
}
