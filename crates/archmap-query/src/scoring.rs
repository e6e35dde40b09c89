//! Weighted field matching behind `rank` and `best_match`
//!
//! Every node is matched against the query in four fields. Each field
//! contributes the weight of its best match kind; the strongest signal
//! also fixes the confidence band.

use std::cmp::Ordering;
use std::fmt;

use archmap_core::{KnowledgeGraph, NodeKind, NodeRef};
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::options::{ALTERNATIVE_LIMIT, DisplayMode, LOW_CONFIDENCE, truncate};
use crate::references::ReferenceIndex;

/// Offered whenever a lookup comes back empty.
pub const NOT_FOUND_SUGGESTION: &str = "Try fewer words, a folder path, or browse the folder hierarchy";

/// Multi-word queries that hit exactly or as a prefix are rarer and count more.
const MULTI_WORD_BOOST: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Path,
    Description,
    Content,
}

impl Field {
    const ALL: [Field; 4] = [Field::Id, Field::Path, Field::Description, Field::Content];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Path => "path",
            Field::Description => "description",
            Field::Content => "content",
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Prefix,
    Phrase,
    AllWords,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Prefix => "prefix",
            MatchKind::Phrase => "phrase",
            MatchKind::AllWords => "all-words",
        }
    }
}

/// Which field matched and how, e.g. `id:exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTag {
    pub field: Field,
    pub kind: MatchKind,
}

impl fmt::Display for MatchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.kind.as_str())
    }
}

impl Serialize for MatchTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn weight(field: Field, kind: MatchKind) -> f64 {
    match (field, kind) {
        (Field::Id, MatchKind::Exact) => 100.0,
        (Field::Id, MatchKind::Prefix) => 60.0,
        (Field::Id, MatchKind::Phrase) => 40.0,
        (Field::Id, MatchKind::AllWords) => 25.0,
        (Field::Path, MatchKind::Exact) => 80.0,
        (Field::Path, MatchKind::Prefix) => 45.0,
        (Field::Path, MatchKind::Phrase) => 30.0,
        (Field::Path, MatchKind::AllWords) => 18.0,
        (Field::Description, MatchKind::Exact) => 40.0,
        (Field::Description, MatchKind::Prefix) => 25.0,
        (Field::Description, MatchKind::Phrase) => 15.0,
        (Field::Description, MatchKind::AllWords) => 10.0,
        (Field::Content, MatchKind::Exact) => 12.0,
        (Field::Content, MatchKind::Prefix) => 8.0,
        (Field::Content, MatchKind::Phrase) => 6.0,
        (Field::Content, MatchKind::AllWords) => 4.0,
    }
}

/// Lowercased query with collapsed whitespace.
#[derive(Debug, Clone)]
struct Query {
    text: String,
    words: Vec<String>,
}

impl Query {
    fn parse(raw: &str) -> Option<Self> {
        let words: Vec<String> = raw.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return None;
        }
        Some(Query {
            text: words.join(" "),
            words,
        })
    }

    fn is_multi_word(&self) -> bool {
        self.words.len() > 1
    }

    fn match_kind(&self, haystack: &str) -> Option<MatchKind> {
        let haystack = haystack.to_lowercase();
        if haystack == self.text {
            Some(MatchKind::Exact)
        } else if haystack.starts_with(&self.text) {
            Some(MatchKind::Prefix)
        } else if haystack.contains(&self.text) {
            Some(MatchKind::Phrase)
        } else if self.is_multi_word() && self.words.iter().all(|w| haystack.contains(w.as_str())) {
            Some(MatchKind::AllWords)
        } else {
            None
        }
    }
}

/// A node with its relevance.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredNode<'g> {
    pub node: NodeRef<'g>,
    pub score: f64,
    pub confidence: f64,
    pub matched: Vec<MatchTag>,
}

fn field_texts<'g>(node: NodeRef<'g>, field: Field, refs: &ReferenceIndex<'g>) -> Vec<&'g str> {
    match field {
        Field::Id => vec![node.id()],
        Field::Path => node.paths(),
        Field::Description => match node.description() {
            "" => Vec::new(),
            text => vec![text],
        },
        Field::Content => match node.as_doc() {
            Some(doc) => vec![doc.content.as_str()],
            None => refs
                .referencing(node.id())
                .iter()
                .map(|doc| doc.content.as_str())
                .collect(),
        },
    }
}

fn score_node<'g>(node: NodeRef<'g>, refs: &ReferenceIndex<'g>, query: &Query) -> Option<ScoredNode<'g>> {
    let matched: Vec<MatchTag> = Field::ALL
        .into_iter()
        .filter_map(|field| {
            field_texts(node, field, refs)
                .into_iter()
                .filter_map(|text| query.match_kind(text))
                .min()
                .map(|kind| MatchTag { field, kind })
        })
        .collect();
    if matched.is_empty() {
        return None;
    }

    let score: f64 = matched
        .iter()
        .map(|tag| {
            let base = weight(tag.field, tag.kind);
            match tag.kind {
                MatchKind::Exact | MatchKind::Prefix if query.is_multi_word() => base * MULTI_WORD_BOOST,
                _ => base,
            }
        })
        .sum();

    Some(ScoredNode {
        node,
        score,
        confidence: confidence(&matched, score, query.is_multi_word()),
        matched,
    })
}

/// Confidence band from the strongest signal present.
fn confidence(matched: &[MatchTag], score: f64, multi_word: bool) -> f64 {
    let has = |field: Option<Field>, kind: MatchKind| {
        matched
            .iter()
            .any(|t| t.kind == kind && field.is_none_or(|f| t.field == f))
    };
    let path_hit = matched.iter().any(|t| t.field == Field::Path);
    let phrase = multi_word && has(None, MatchKind::Phrase);

    if has(None, MatchKind::Exact) {
        1.0
    } else if has(Some(Field::Id), MatchKind::Prefix) {
        0.85
    } else if phrase && path_hit {
        0.8
    } else if path_hit {
        0.75
    } else if phrase {
        0.7
    } else if has(None, MatchKind::AllWords) {
        0.6
    } else if score >= 50.0 {
        0.65
    } else if score >= 20.0 {
        0.5
    } else {
        0.3
    }
}

fn compare_ranked(a: &ScoredNode<'_>, b: &ScoredNode<'_>) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.node.kind().cmp(&b.node.kind()))
        .then_with(|| a.node.id().cmp(b.node.id()))
}

/// Every matching node, best first. An empty query matches nothing.
pub fn rank<'g>(graph: &'g KnowledgeGraph, refs: &ReferenceIndex<'g>, query: &str) -> Vec<ScoredNode<'g>> {
    let Some(query) = Query::parse(query) else {
        return Vec::new();
    };
    let candidates: Vec<NodeRef<'g>> = graph.nodes().collect();
    let mut scored: Vec<ScoredNode<'g>> = candidates
        .par_iter()
        .filter_map(|node| score_node(*node, refs, &query))
        .collect();
    scored.sort_by(compare_ranked);
    tracing::debug!("`{}` matched {} nodes", query.text, scored.len());
    scored
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub id: String,
    pub kind: NodeKind,
    pub confidence: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch<'g> {
    pub node: NodeRef<'g>,
    pub score: f64,
    pub confidence: f64,
    pub matched: Vec<MatchTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum MatchOutcome<'g> {
    Found(BestMatch<'g>),
    NotFound { query: String, suggestion: String },
}

impl<'g> MatchOutcome<'g> {
    pub fn found(&self) -> Option<&BestMatch<'g>> {
        match self {
            MatchOutcome::Found(best) => Some(best),
            MatchOutcome::NotFound { .. } => None,
        }
    }
}

/// Top-ranked node, with runner-ups when the winner is uncertain.
pub fn best_match<'g>(
    graph: &'g KnowledgeGraph,
    refs: &ReferenceIndex<'g>,
    query: &str,
    mode: DisplayMode,
) -> MatchOutcome<'g> {
    let mut ranked = rank(graph, refs, query).into_iter();
    let Some(winner) = ranked.next() else {
        return MatchOutcome::NotFound {
            query: query.to_string(),
            suggestion: NOT_FOUND_SUGGESTION.to_string(),
        };
    };

    let alternatives = if winner.confidence < LOW_CONFIDENCE {
        ranked
            .take(ALTERNATIVE_LIMIT)
            .map(|candidate| Alternative {
                id: candidate.node.id().to_string(),
                kind: candidate.node.kind(),
                confidence: candidate.confidence,
                description: truncate(candidate.node.description(), mode.description_limit()),
            })
            .collect()
    } else {
        Vec::new()
    };

    MatchOutcome::Found(BestMatch {
        node: winner.node,
        score: winner.score,
        confidence: winner.confidence,
        matched: winner.matched,
        alternatives,
    })
}
