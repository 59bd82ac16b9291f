use std::cmp::Ordering;
use std::collections::HashMap;

use crate::index::{DocId, SearchIndex};
use crate::tokenizer;

/// Whether a multi-term query intersects or unions its per-term matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every query term must match the document.
    #[default]
    All,
    /// At least one query term must match the document.
    Any,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub mode: MatchMode,
    /// Maximum number of hits returned; clamped to 1..=100.
    pub limit: usize,
    /// Multiplier applied to title-term posting weights.
    pub title_boost: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::All,
            limit: 10,
            title_boost: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
    pub docname: String,
    pub filename: String,
}

impl SearchIndex {
    /// Rank documents against a free-text query.
    ///
    /// The query runs through the same normalization pipeline as indexing,
    /// so `"Computing NDVI"` matches documents indexed under `comput` and
    /// `ndvi`. A document matches a term when it appears in the term's body
    /// or title postings; score is the sum of body weights plus
    /// `title_boost` times title weights, with ties broken by ascending
    /// document id. A query that normalizes to nothing, or an `All`-mode
    /// query with an unmatched term, returns an empty result rather than
    /// an error.
    pub fn search(&self, query: &str, config: &SearchConfig) -> Vec<SearchHit> {
        let mut query_terms = tokenizer::tokenize(query);
        query_terms.sort();
        query_terms.dedup();
        if query_terms.is_empty() {
            return Vec::new();
        }

        // per-document (matched term count, accumulated score)
        let mut accum: HashMap<DocId, (usize, f32)> = HashMap::new();
        for term in &query_terms {
            let mut contrib: HashMap<DocId, f32> = HashMap::new();
            for p in self.postings(term) {
                *contrib.entry(p.doc_id).or_insert(0.0) += p.weight;
            }
            for p in self.title_postings(term) {
                *contrib.entry(p.doc_id).or_insert(0.0) += p.weight * config.title_boost;
            }
            for (doc_id, score) in contrib {
                let entry = accum.entry(doc_id).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += score;
            }
        }

        let required = match config.mode {
            MatchMode::All => query_terms.len(),
            MatchMode::Any => 1,
        };
        let mut scored: Vec<(DocId, f32)> = accum
            .into_iter()
            .filter(|(_, (matched, _))| *matched >= required)
            .map(|(doc_id, (_, score))| (doc_id, score))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(config.limit.max(1).min(100));

        scored
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.docs.get(doc_id as usize).map(|doc| SearchHit {
                    doc_id,
                    score,
                    title: doc.title.clone(),
                    docname: doc.docname.clone(),
                    filename: doc.filename.clone(),
                })
            })
            .collect()
    }
}
