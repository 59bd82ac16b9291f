use std::collections::HashMap;

use crate::error::{IndexError, Result};
use crate::format::EnvVersion;
use crate::index::{DocId, Document, Posting, SearchIndex};
use crate::tokenizer;

/// Version stamped into `envversion` by this builder.
pub const BUILD_VERSION: u64 = 1;

/// Accumulates documents and freezes them into an immutable
/// [`SearchIndex`]. This is the build step a documentation generator
/// performs offline, exposed as a library API.
#[derive(Default)]
pub struct IndexBuilder {
    docs: Vec<Document>,
    term_counts: HashMap<String, HashMap<DocId, u32>>,
    title_counts: HashMap<String, HashMap<DocId, u32>>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one document. Body terms are weighted by occurrence count;
    /// title terms always land in the title table, which keeps every
    /// document reachable through title search even when its body
    /// contributes no terms.
    pub fn add_document(
        &mut self,
        docname: &str,
        filename: &str,
        title: &str,
        body: &str,
    ) -> Result<DocId> {
        if self.docs.iter().any(|d| d.docname == docname) {
            return Err(IndexError::DuplicateDoc(docname.to_string()));
        }
        let doc_id = self.docs.len() as DocId;
        for term in tokenizer::tokenize(body) {
            *self
                .term_counts
                .entry(term)
                .or_default()
                .entry(doc_id)
                .or_insert(0) += 1;
        }
        for term in tokenizer::tokenize(title) {
            *self
                .title_counts
                .entry(term)
                .or_default()
                .entry(doc_id)
                .or_insert(0) += 1;
        }
        self.docs.push(Document {
            docname: docname.to_string(),
            filename: filename.to_string(),
            title: title.to_string(),
        });
        Ok(doc_id)
    }

    pub fn finish(self) -> Result<SearchIndex> {
        let num_docs = self.docs.len();
        let terms = freeze(self.term_counts);
        let titleterms = freeze(self.title_counts);
        tracing::info!(num_docs, num_terms = terms.len(), "built search index");
        SearchIndex::from_parts(
            self.docs,
            terms,
            titleterms,
            EnvVersion::Number(BUILD_VERSION),
            Default::default(),
            Default::default(),
            Default::default(),
        )
    }
}

fn freeze(counts: HashMap<String, HashMap<DocId, u32>>) -> HashMap<String, Vec<Posting>> {
    counts
        .into_iter()
        .map(|(term, docs)| {
            let postings = docs
                .into_iter()
                .map(|(doc_id, count)| Posting {
                    doc_id,
                    weight: count as f32,
                })
                .collect();
            (term, postings)
        })
        .collect()
}
