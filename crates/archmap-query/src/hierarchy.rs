//! Folder tree listing

use std::collections::HashSet;

use archmap_core::{DocNode, DocPriority, FolderNode, KnowledgeGraph, ROOT_FOLDER_ID, StructureGraph};
use serde::Serialize;

use crate::context::DocSummary;
use crate::options::{Depth, DisplayMode, truncate};
use crate::references::ReferenceIndex;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyEntry<'g> {
    pub id: &'g str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'g str>,
    pub description: String,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<&'g str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy<'g> {
    pub root: &'g str,
    /// Depth-first pre-order, siblings by ID.
    pub folders: Vec<HierarchyEntry<'g>>,
    pub essential_docs: Vec<DocSummary>,
}

pub fn list_hierarchy<'g>(
    graph: &'g KnowledgeGraph,
    structure: &StructureGraph,
    refs: &ReferenceIndex<'g>,
    start: &'g FolderNode,
    max_depth: Depth,
    mode: DisplayMode,
) -> Hierarchy<'g> {
    let mut folders: Vec<HierarchyEntry<'g>> = Vec::new();
    let mut seen: HashSet<&'g str> = HashSet::new();
    let mut stack: Vec<(&'g FolderNode, usize, Option<&'g str>)> = vec![(start, 0, None)];

    while let Some((folder, depth, parent)) = stack.pop() {
        if !seen.insert(folder.id.as_str()) {
            continue;
        }
        folders.push(HierarchyEntry {
            id: &folder.id,
            path: folder.location(),
            description: truncate(&folder.description, mode.description_limit()),
            depth,
            parent,
        });
        if !max_depth.allows_expansion(depth) {
            continue;
        }
        // Reversed so the smallest ID is popped first.
        for child in structure.child_folders(&folder.id).into_iter().rev() {
            if let Some(child_folder) = graph.nodes.folders.get(&child.id) {
                stack.push((child_folder, depth + 1, Some(folder.id.as_str())));
            }
        }
    }

    let essential = essential_docs(graph, refs, start, &folders);
    Hierarchy {
        root: &start.id,
        folders,
        essential_docs: essential
            .into_iter()
            .map(|doc| DocSummary::from_doc(doc, mode))
            .collect(),
    }
}

/// Constraint and essential docs worth reading alongside the listing. From
/// the root that is every such doc; otherwise those touching a listed folder.
fn essential_docs<'g>(
    graph: &'g KnowledgeGraph,
    refs: &ReferenceIndex<'g>,
    start: &FolderNode,
    listed: &[HierarchyEntry<'g>],
) -> Vec<&'g DocNode> {
    let mut docs: Vec<&'g DocNode> = if start.id == ROOT_FOLDER_ID {
        graph.nodes.docs.values().collect()
    } else {
        let mut seen = HashSet::new();
        listed
            .iter()
            .flat_map(|entry| refs.referencing(entry.id).iter().copied())
            .filter(|doc| seen.insert(doc.id.as_str()))
            .collect()
    };
    docs.retain(|doc| doc.priority != DocPriority::Supplementary);
    docs.sort_by_key(|doc| doc.priority);
    docs
}
