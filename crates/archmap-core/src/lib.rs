//! Archmap Core: knowledge graph model, builder, and store

pub mod builder;
pub mod error;
pub mod graph;
pub mod input;
pub mod model;
pub mod paths;
pub mod store;
pub mod validate;

#[doc(hidden)]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use builder::{GraphBuilder, build_graph};
pub use error::{ArchmapError, Result};
pub use graph::{StructureGraph, StructureNode};
pub use input::{CodeEntry, DocumentationUnit, FolderEntry, References, VocabularyRegistry};
pub use model::{
    DocNode, DocPriority, Edge, EdgeType, ExportNode, FolderNode, GraphMetadata, GraphStats,
    KnowledgeGraph, ModuleNode, NodeKind, NodeMaps, NodeRef, ROOT_FOLDER_ID, ROOT_PATH,
    SCHEMA_VERSION, TermNode,
};
pub use store::{
    GRAPH_FILE, STORE_DIR, clear_store, ensure_store_dir, graph_path, load_graph, read_graph,
    save_graph, store_dir, write_graph,
};
pub use validate::ValidationReport;
