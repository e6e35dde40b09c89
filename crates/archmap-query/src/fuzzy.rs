//! Typo-tolerant search using fuzzy-matcher's skim scorer
//!
//! Scores are normalized into `[0, 1]`: each query word is scored against
//! the node's fields relative to a perfect self-match, then averaged.

use std::cmp::Ordering;

use archmap_core::{KnowledgeGraph, NodeRef};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use crate::scoring::Field;

/// Characters of doc content considered for matching.
const CONTENT_PREVIEW: usize = 200;

/// Share of the remaining distance to 1.0 granted for a literal hit.
pub(crate) const SUBSTRING_BOOST: f64 = 0.3;

fn field_weight(field: Field) -> f64 {
    match field {
        Field::Id => 1.0,
        Field::Path => 0.8,
        Field::Description => 0.6,
        Field::Content => 0.3,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'g> {
    pub node: NodeRef<'g>,
    pub score: f64,
    /// Fields that produced the best score for some query word.
    pub fields: Vec<Field>,
}

pub struct FuzzySearch {
    matcher: SkimMatcherV2,
}

impl FuzzySearch {
    pub fn new() -> Self {
        FuzzySearch {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Up to `limit` hits, best first. Nodes where no word matches anything
    /// are left out.
    pub fn search<'g>(&self, graph: &'g KnowledgeGraph, query: &str, limit: usize) -> Vec<SearchHit<'g>> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'g>> = graph
            .nodes()
            .filter_map(|node| self.score_node(node, &words))
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.node.kind().cmp(&b.node.kind()))
                .then_with(|| a.node.id().cmp(b.node.id()))
        });
        hits.truncate(limit);
        hits
    }

    fn score_node<'g>(&self, node: NodeRef<'g>, words: &[String]) -> Option<SearchHit<'g>> {
        let haystacks = haystacks(node);
        let mut total = 0.0;
        let mut fields: Vec<Field> = Vec::new();

        for word in words {
            let perfect = self.matcher.fuzzy_match(word, word).unwrap_or(1).max(1) as f64;
            let best = haystacks
                .iter()
                .filter_map(|&(field, text)| {
                    let raw = self.matcher.fuzzy_match(text, word)?;
                    let normalized = (raw as f64 / perfect).min(1.0);
                    Some((field, field_weight(field) * normalized))
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
            if let Some((field, score)) = best {
                total += score;
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }

        if fields.is_empty() {
            return None;
        }

        let mut score = total / words.len() as f64;
        let literal = haystacks.iter().any(|(_, text)| {
            let text = text.to_lowercase();
            words.iter().any(|w| text.contains(w.as_str()))
        });
        if literal {
            score += (1.0 - score) * SUBSTRING_BOOST;
        }
        fields.sort();

        Some(SearchHit {
            node,
            score: score.clamp(0.0, 1.0),
            fields,
        })
    }
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self::new()
    }
}

fn haystacks<'g>(node: NodeRef<'g>) -> Vec<(Field, &'g str)> {
    let mut texts = vec![(Field::Id, node.id())];
    texts.extend(node.paths().into_iter().map(|p| (Field::Path, p)));
    if !node.description().is_empty() {
        texts.push((Field::Description, node.description()));
    }
    if let Some(doc) = node.as_doc() {
        texts.push((Field::Content, preview(&doc.content)));
    }
    texts
}

/// Char-safe prefix of at most [`CONTENT_PREVIEW`] characters.
fn preview(content: &str) -> &str {
    match content.char_indices().nth(CONTENT_PREVIEW) {
        Some((boundary, _)) => &content[..boundary],
        None => content,
    }
}
