//! Archmap Query: resolution, ranking, search and traversal over a built
//! knowledge graph

pub mod context;
pub mod engine;
pub mod fuzzy;
pub mod hierarchy;
pub mod options;
pub mod references;
pub mod resolver;
pub mod scoring;


pub use context::{ContextResult, DocSummary, Traversal, VisitedNode};
pub use engine::QueryEngine;
pub use fuzzy::{FuzzySearch, SearchHit};
pub use hierarchy::{Hierarchy, HierarchyEntry};
pub use options::{Depth, DisplayMode, QueryOptions, truncate};
pub use references::ReferenceIndex;
pub use resolver::{ResolveMethod, ResolvedNode};
pub use scoring::{
    Alternative, BestMatch, Field, MatchKind, MatchOutcome, MatchTag, NOT_FOUND_SUGGESTION, ScoredNode,
};
