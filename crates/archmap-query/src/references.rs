//! Reverse index from a node ID to the documents that reference it

use std::collections::HashMap;

use archmap_core::{DocNode, EdgeType, KnowledgeGraph};

#[derive(Debug, Default)]
pub struct ReferenceIndex<'g> {
    by_target: HashMap<&'g str, Vec<&'g DocNode>>,
}

impl<'g> ReferenceIndex<'g> {
    /// Index every `references` edge whose source is a known document.
    pub fn new(graph: &'g KnowledgeGraph) -> Self {
        let mut by_target: HashMap<&'g str, Vec<&'g DocNode>> = HashMap::new();
        for edge in graph.edges_of_type(EdgeType::References) {
            match graph.nodes.docs.get(&edge.from) {
                Some(doc) => by_target.entry(edge.to.as_str()).or_default().push(doc),
                None => tracing::debug!("Reference from unknown doc `{}` skipped", edge.from),
            }
        }
        ReferenceIndex { by_target }
    }

    /// Documents referencing `id`, in edge order.
    pub fn referencing(&self, id: &str) -> &[&'g DocNode] {
        self.by_target.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}
