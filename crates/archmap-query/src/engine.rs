//! Read-only query facade over a built graph

use archmap_core::{ArchmapError, KnowledgeGraph, ROOT_FOLDER_ID, Result, StructureGraph};
use tracing::debug;

use crate::context::{ContextResult, traverse};
use crate::fuzzy::{FuzzySearch, SearchHit};
use crate::hierarchy::{Hierarchy, list_hierarchy};
use crate::options::{Depth, QueryOptions};
use crate::references::ReferenceIndex;
use crate::resolver::{self, ResolvedNode};
use crate::scoring::{self, MatchOutcome, ScoredNode};

/// Answers queries against one graph. Indexes are built once up front and
/// the graph is never mutated.
pub struct QueryEngine<'g> {
    graph: &'g KnowledgeGraph,
    structure: StructureGraph,
    references: ReferenceIndex<'g>,
    fuzzy: FuzzySearch,
    options: QueryOptions,
}

impl<'g> QueryEngine<'g> {
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        Self::with_options(graph, QueryOptions::default())
    }

    pub fn with_options(graph: &'g KnowledgeGraph, options: QueryOptions) -> Self {
        let structure = StructureGraph::from_graph(graph);
        debug!(
            "Query engine ready: {} nodes, {} structural edges",
            structure.node_count(),
            structure.edge_count()
        );
        QueryEngine {
            graph,
            structure,
            references: ReferenceIndex::new(graph),
            fuzzy: FuzzySearch::new(),
            options,
        }
    }

    pub fn graph(&self) -> &'g KnowledgeGraph {
        self.graph
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn resolve(&self, identifier: &str) -> Option<ResolvedNode<'g>> {
        resolver::resolve(self.graph, identifier)
    }

    pub fn rank(&self, query: &str) -> Vec<ScoredNode<'g>> {
        scoring::rank(self.graph, &self.references, query)
    }

    pub fn best_match(&self, query: &str) -> MatchOutcome<'g> {
        scoring::best_match(self.graph, &self.references, query, self.options.mode)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit<'g>> {
        self.search_with_limit(query, self.options.search_limit)
    }

    pub fn search_with_limit(&self, query: &str, limit: usize) -> Vec<SearchHit<'g>> {
        self.fuzzy.search(self.graph, query, limit)
    }

    /// Context around `identifier`, or around the root when none is given.
    pub fn context(&self, identifier: Option<&str>, max_depth: Depth) -> Result<ContextResult<'g>> {
        let start = self.start_node(identifier)?;
        let traversal = traverse(self.graph, &self.structure, &self.references, start.node, max_depth);
        let trail = self.structure.ancestors(start.id);
        Ok(ContextResult::new(start, trail, traversal, self.options.mode))
    }

    /// Folder tree below `identifier`, or below the root when none is given.
    pub fn list_hierarchy(&self, identifier: Option<&str>, max_depth: Depth) -> Result<Hierarchy<'g>> {
        let start = self.start_node(identifier)?;
        let folder = start
            .node
            .as_folder()
            .ok_or_else(|| ArchmapError::NotAFolder(start.id.to_string()))?;
        Ok(list_hierarchy(
            self.graph,
            &self.structure,
            &self.references,
            folder,
            max_depth,
            self.options.mode,
        ))
    }

    fn start_node(&self, identifier: Option<&str>) -> Result<ResolvedNode<'g>> {
        let root = self
            .graph
            .root()
            .ok_or_else(|| ArchmapError::MissingRoot(ROOT_FOLDER_ID.to_string()))?;
        match identifier {
            Some(identifier) => self
                .resolve(identifier)
                .ok_or_else(|| ArchmapError::UnknownNode(identifier.to_string())),
            None => self
                .resolve(&root.id)
                .ok_or_else(|| ArchmapError::MissingRoot(ROOT_FOLDER_ID.to_string())),
        }
    }
}
