//! Core data structures for the knowledge graph

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// ID of the folder injected at the top of the resolved path space.
pub const ROOT_FOLDER_ID: &str = "root";

/// Path of the root folder, relative to the base directory.
pub const ROOT_PATH: &str = ".";

/// Schema tag written into graph metadata.
pub const SCHEMA_VERSION: &str = "1.0";

/// Node category. Declaration order is the lookup priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Module,
    Export,
    Term,
    Doc,
}

impl NodeKind {
    /// Order in which "all categories" lookups scan the dictionaries.
    pub const PRIORITY: [NodeKind; 5] = [
        NodeKind::Folder,
        NodeKind::Module,
        NodeKind::Export,
        NodeKind::Term,
        NodeKind::Doc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Module => "module",
            NodeKind::Export => "export",
            NodeKind::Term => "term",
            NodeKind::Doc => "doc",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly a document should be surfaced. Sorts constraint-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocPriority {
    Constraint,
    Essential,
    #[default]
    Supplementary,
}

/// A named directory of the codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "folder", rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
    #[serde(default)]
    pub path_exists: bool,
}

impl FolderNode {
    /// The folder every build injects before any vocabulary folder.
    pub fn root() -> Self {
        FolderNode {
            id: ROOT_FOLDER_ID.to_string(),
            description: "Project root".to_string(),
            path: Some(ROOT_PATH.to_string()),
            resolved_path: Some(ROOT_PATH.to_string()),
            path_exists: true,
        }
    }

    /// Resolved path, falling back to the declared one.
    pub fn location(&self) -> Option<&str> {
        self.resolved_path.as_deref().or(self.path.as_deref())
    }
}

/// A source module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "module", rename_all = "camelCase")]
pub struct ModuleNode {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
    #[serde(default)]
    pub path_exists: bool,
}

/// A symbol exported from a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "export", rename_all = "camelCase")]
pub struct ExportNode {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
    #[serde(default)]
    pub path_exists: bool,
}

/// A domain term. Not tied to any location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "term", rename_all = "camelCase")]
pub struct TermNode {
    pub id: String,
    pub description: String,
}

/// One documentation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "doc", rename_all = "camelCase")]
pub struct DocNode {
    pub id: String,
    pub file_path: String,
    pub content: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub priority: DocPriority,
    #[serde(default)]
    pub explains: String,
}

/// Relationship carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    /// doc → any node, declared by the documentation unit.
    References,
    /// module/export → folder, or export → module.
    BelongsTo,
    /// folder → folder.
    Contains,
    /// Reserved; no inference rule emits it.
    RelatedTo,
}

/// A directed edge between two node IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeType,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeType) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }
}

/// One dictionary per node category, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMaps {
    #[serde(default)]
    pub folders: BTreeMap<String, FolderNode>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleNode>,
    #[serde(default)]
    pub terms: BTreeMap<String, TermNode>,
    #[serde(default)]
    pub exports: BTreeMap<String, ExportNode>,
    #[serde(default)]
    pub docs: BTreeMap<String, DocNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub folder_count: usize,
    pub module_count: usize,
    pub term_count: usize,
    pub export_count: usize,
    pub doc_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub generated_at: String,
    pub version: String,
    pub root_path: String,
    pub stats: GraphStats,
}

/// The built graph. Immutable once the builder hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: NodeMaps,
    pub edges: Vec<Edge>,
    pub metadata: GraphMetadata,
}

impl KnowledgeGraph {
    /// An empty graph with fresh metadata. No root folder yet.
    pub fn empty(root_path: impl Into<String>) -> Self {
        KnowledgeGraph {
            nodes: NodeMaps::default(),
            edges: Vec::new(),
            metadata: GraphMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                version: SCHEMA_VERSION.to_string(),
                root_path: root_path.into(),
                stats: GraphStats::default(),
            },
        }
    }

    /// Look up a node within one category.
    pub fn node(&self, kind: NodeKind, id: &str) -> Option<NodeRef<'_>> {
        match kind {
            NodeKind::Folder => self.nodes.folders.get(id).map(NodeRef::Folder),
            NodeKind::Module => self.nodes.modules.get(id).map(NodeRef::Module),
            NodeKind::Export => self.nodes.exports.get(id).map(NodeRef::Export),
            NodeKind::Term => self.nodes.terms.get(id).map(NodeRef::Term),
            NodeKind::Doc => self.nodes.docs.get(id).map(NodeRef::Doc),
        }
    }

    /// Look up an ID across every category in priority order.
    pub fn find(&self, id: &str) -> Option<NodeRef<'_>> {
        NodeKind::PRIORITY
            .into_iter()
            .find_map(|kind| self.node(kind, id))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn root(&self) -> Option<&FolderNode> {
        self.nodes.folders.get(ROOT_FOLDER_ID)
    }

    /// Every node, category by category in priority order, IDs ascending.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let n = &self.nodes;
        n.folders
            .values()
            .map(NodeRef::Folder)
            .chain(n.modules.values().map(NodeRef::Module))
            .chain(n.exports.values().map(NodeRef::Export))
            .chain(n.terms.values().map(NodeRef::Term))
            .chain(n.docs.values().map(NodeRef::Doc))
    }

    pub fn node_count(&self) -> usize {
        let n = &self.nodes;
        n.folders.len() + n.modules.len() + n.exports.len() + n.terms.len() + n.docs.len()
    }

    pub fn edges_of_type(&self, kind: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Recompute the per-category counts stored in metadata.
    pub fn refresh_stats(&mut self) {
        self.metadata.stats = GraphStats {
            folder_count: self.nodes.folders.len(),
            module_count: self.nodes.modules.len(),
            term_count: self.nodes.terms.len(),
            export_count: self.nodes.exports.len(),
            doc_count: self.nodes.docs.len(),
            edge_count: self.edges.len(),
        };
    }
}

/// Borrowed view of a node of any category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'g> {
    Folder(&'g FolderNode),
    Module(&'g ModuleNode),
    Export(&'g ExportNode),
    Term(&'g TermNode),
    Doc(&'g DocNode),
}

impl<'g> NodeRef<'g> {
    pub fn id(&self) -> &'g str {
        match *self {
            NodeRef::Folder(n) => &n.id,
            NodeRef::Module(n) => &n.id,
            NodeRef::Export(n) => &n.id,
            NodeRef::Term(n) => &n.id,
            NodeRef::Doc(n) => &n.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::Folder(_) => NodeKind::Folder,
            NodeRef::Module(_) => NodeKind::Module,
            NodeRef::Export(_) => NodeKind::Export,
            NodeRef::Term(_) => NodeKind::Term,
            NodeRef::Doc(_) => NodeKind::Doc,
        }
    }

    /// Human description. Docs answer with their one-line summary.
    pub fn description(&self) -> &'g str {
        match *self {
            NodeRef::Folder(n) => &n.description,
            NodeRef::Module(n) => &n.description,
            NodeRef::Export(n) => &n.description,
            NodeRef::Term(n) => &n.description,
            NodeRef::Doc(n) => &n.explains,
        }
    }

    /// Every path-like string attached to the node, deduplicated.
    pub fn paths(&self) -> Vec<&'g str> {
        let candidates: [Option<&'g str>; 2] = match *self {
            NodeRef::Folder(n) => [n.path.as_deref(), n.resolved_path.as_deref()],
            NodeRef::Module(n) => [n.resolved_path.as_deref(), n.import_path.as_deref()],
            NodeRef::Export(n) => [n.resolved_path.as_deref(), n.import_path.as_deref()],
            NodeRef::Term(_) => [None, None],
            NodeRef::Doc(n) => [Some(n.file_path.as_str()), None],
        };
        let mut paths: Vec<&'g str> = Vec::with_capacity(2);
        for p in candidates.into_iter().flatten() {
            if !paths.contains(&p) {
                paths.push(p);
            }
        }
        paths
    }

    pub fn as_doc(&self) -> Option<&'g DocNode> {
        match *self {
            NodeRef::Doc(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_folder(&self) -> Option<&'g FolderNode> {
        match *self {
            NodeRef::Folder(f) => Some(f),
            _ => None,
        }
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeRef::Folder(n) => n.serialize(serializer),
            NodeRef::Module(n) => n.serialize(serializer),
            NodeRef::Export(n) => n.serialize(serializer),
            NodeRef::Term(n) => n.serialize(serializer),
            NodeRef::Doc(n) => n.serialize(serializer),
        }
    }
}
