//! Graph construction: vocabulary + documentation → typed nodes and
//! inferred edges
//!
//! The build is one deterministic pass. Node dictionaries are ordered maps and
//! every inference step iterates them in ID order, so two builds over the same
//! input produce identical node and edge sets.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, info, warn};

use crate::input::{DocumentationUnit, References, VocabularyRegistry};
use crate::model::*;
use crate::paths;

/// Builds a [`KnowledgeGraph`] from a frozen snapshot of the inputs.
pub struct GraphBuilder<'a> {
    registry: &'a VocabularyRegistry,
    docs: &'a [DocumentationUnit],
    base_dir: String,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        registry: &'a VocabularyRegistry,
        docs: &'a [DocumentationUnit],
        base_dir: impl Into<String>,
    ) -> Self {
        GraphBuilder {
            registry,
            docs,
            base_dir: base_dir.into(),
        }
    }

    /// Run every build step in order and return the finished graph.
    pub fn build(&self) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::empty(self.base_dir.clone());

        // Later steps read the dictionaries populated by earlier ones.
        graph
            .nodes
            .folders
            .insert(ROOT_FOLDER_ID.to_string(), FolderNode::root());
        self.materialize_vocabulary(&mut graph);
        self.materialize_docs(&mut graph);

        let mut edges = self.link_references(&graph);
        edges.extend(infer_hierarchy(&graph));
        edges.extend(infer_module_membership(&graph));
        edges.extend(infer_export_membership(&graph));
        graph.edges = edges;

        graph.refresh_stats();
        let stats = graph.metadata.stats;
        info!(
            "Built knowledge graph: {} folders, {} modules, {} exports, {} terms, {} docs, {} edges",
            stats.folder_count,
            stats.module_count,
            stats.export_count,
            stats.term_count,
            stats.doc_count,
            stats.edge_count
        );
        graph
    }

    fn portable(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| paths::relativize(&self.base_dir, p))
    }

    fn materialize_vocabulary(&self, graph: &mut KnowledgeGraph) {
        for (name, entry) in &self.registry.folders {
            if name == ROOT_FOLDER_ID {
                warn!("Vocabulary folder `{}` collides with the root folder; skipped", name);
                continue;
            }
            graph.nodes.folders.insert(
                name.clone(),
                FolderNode {
                    id: name.clone(),
                    description: entry.desc.clone(),
                    path: entry.path.clone(),
                    resolved_path: self.portable(entry.resolved_path.as_deref()),
                    path_exists: entry.path_exists,
                },
            );
        }

        for (name, entry) in &self.registry.modules {
            graph.nodes.modules.insert(
                name.clone(),
                ModuleNode {
                    id: name.clone(),
                    description: entry.desc.clone(),
                    type_signature: entry.type_signature.clone(),
                    import_path: entry.import_path.clone(),
                    resolved_path: self.portable(entry.resolved_path.as_deref()),
                    path_exists: entry.path_exists,
                },
            );
        }

        for (name, entry) in &self.registry.exports {
            graph.nodes.exports.insert(
                name.clone(),
                ExportNode {
                    id: name.clone(),
                    description: entry.desc.clone(),
                    type_signature: entry.type_signature.clone(),
                    import_path: entry.import_path.clone(),
                    resolved_path: self.portable(entry.resolved_path.as_deref()),
                    path_exists: entry.path_exists,
                },
            );
        }

        for (name, desc) in &self.registry.terms {
            graph.nodes.terms.insert(
                name.clone(),
                TermNode {
                    id: name.clone(),
                    description: desc.clone(),
                },
            );
        }
    }

    fn materialize_docs(&self, graph: &mut KnowledgeGraph) {
        for unit in self.docs {
            let file_path = paths::relativize(&self.base_dir, &unit.file_path);
            let node = DocNode {
                id: file_path.clone(),
                file_path: file_path.clone(),
                content: unit.content.clone(),
                format: unit.format.clone(),
                priority: unit.priority,
                explains: unit.explains.clone(),
            };
            match graph.nodes.docs.entry(file_path) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                Entry::Occupied(mut slot) => {
                    warn!("Duplicate documentation unit `{}`; keeping the later one", slot.key());
                    slot.insert(node);
                }
            }
        }
    }

    /// One `references` edge per declared name that exists in its category.
    /// Docs are visited in ID order; the last unit for a path wins, matching
    /// [`Self::materialize_docs`].
    fn link_references(&self, graph: &KnowledgeGraph) -> Vec<Edge> {
        let declared: BTreeMap<String, &References> = self
            .docs
            .iter()
            .map(|unit| (paths::relativize(&self.base_dir, &unit.file_path), &unit.references))
            .collect();

        let mut edges = Vec::new();
        let mut dropped = 0usize;
        for (doc_id, refs) in declared {
            let refs = refs.deduped();
            let targets = [
                (NodeKind::Folder, &refs.folders),
                (NodeKind::Module, &refs.modules),
                (NodeKind::Export, &refs.exports),
                (NodeKind::Term, &refs.terms),
            ];
            for (kind, names) in targets {
                for name in names {
                    if graph.node(kind, name).is_some() {
                        edges.push(Edge::new(&doc_id, name, EdgeType::References));
                    } else {
                        dropped += 1;
                        debug!("{} references unknown {} `{}`; dropped", doc_id, kind, name);
                    }
                }
            }
        }

        if dropped > 0 {
            debug!("Dropped {} unresolved references", dropped);
        }
        edges
    }
}

/// Convenience wrapper around [`GraphBuilder`].
pub fn build_graph(
    registry: &VocabularyRegistry,
    docs: &[DocumentationUnit],
    base_dir: &str,
) -> KnowledgeGraph {
    GraphBuilder::new(registry, docs, base_dir).build()
}

/// Emit one `contains` edge per folder from its most specific strict
/// ancestor. Equal-length candidates fall back to the smallest ID.
fn infer_hierarchy(graph: &KnowledgeGraph) -> Vec<Edge> {
    let located: Vec<(&str, &str)> = graph
        .nodes
        .folders
        .values()
        .filter_map(|f| f.resolved_path.as_deref().map(|p| (f.id.as_str(), p)))
        .collect();

    let mut edges = Vec::new();
    for &(child_id, child_path) in &located {
        let parent = located
            .iter()
            .filter(|(id, path)| *id != child_id && paths::is_strict_ancestor(path, child_path))
            .fold(None, most_specific);
        if let Some((parent_id, _)) = parent {
            edges.push(Edge::new(parent_id, child_id, EdgeType::Contains));
        }
    }
    edges
}

/// Fold step picking the deepest path; ties keep the smaller ID.
///
/// Depth counts segments, so the root `.` never outranks a one-letter folder.
fn most_specific<'a>(
    best: Option<(&'a str, &'a str)>,
    candidate: &(&'a str, &'a str),
) -> Option<(&'a str, &'a str)> {
    let depth = |path: &str| paths::segments(path).len();
    match best {
        Some(current) if depth(current.1) > depth(candidate.1) => Some(current),
        Some(current) if depth(current.1) == depth(candidate.1) && current.0 <= candidate.0 => {
            Some(current)
        }
        _ => Some(*candidate),
    }
}

/// Most specific folder whose resolved path contains `path`.
fn owning_folder<'g>(graph: &'g KnowledgeGraph, path: &str) -> Option<&'g str> {
    graph
        .nodes
        .folders
        .values()
        .filter_map(|f| f.resolved_path.as_deref().map(|p| (f.id.as_str(), p)))
        .filter(|(_, folder_path)| paths::is_within(folder_path, path))
        .fold(None, |best, candidate| most_specific(best, &candidate))
        .map(|(id, _)| id)
}

fn infer_module_membership(graph: &KnowledgeGraph) -> Vec<Edge> {
    graph
        .nodes
        .modules
        .values()
        .filter_map(|module| {
            let path = module.resolved_path.as_deref()?;
            let folder = owning_folder(graph, path)?;
            Some(Edge::new(&module.id, folder, EdgeType::BelongsTo))
        })
        .collect()
}

/// Exports attach to a module in the same file first, then to a folder.
fn infer_export_membership(graph: &KnowledgeGraph) -> Vec<Edge> {
    graph
        .nodes
        .exports
        .values()
        .filter_map(|export| {
            let path = export.resolved_path.as_deref()?;
            let same_file_module = graph.nodes.modules.values().find(|m| {
                m.resolved_path
                    .as_deref()
                    .is_some_and(|mp| paths::same_file(mp, path))
            });
            let owner = match same_file_module {
                Some(module) => module.id.as_str(),
                None => owning_folder(graph, path)?,
            };
            Some(Edge::new(&export.id, owner, EdgeType::BelongsTo))
        })
        .collect()
}
