use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::{IndexError, Result};
use crate::format::{EnvVersion, RawIndex, TermPostings};

pub type DocId = u32;

/// One indexed page, addressed by its position in the document table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub docname: String,
    pub filename: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32,
}

/// Immutable term index store. Built once from a [`RawIndex`] payload (or
/// by [`crate::builder::IndexBuilder`]) and read-only afterwards, so it can
/// be shared across threads without locking.
///
/// Posting lists are sorted by `doc_id` with duplicates merged, and every
/// referenced document id is validated against the document table at
/// construction time.
#[derive(Debug)]
pub struct SearchIndex {
    pub(crate) docs: Vec<Document>,
    pub(crate) docname_ids: HashMap<String, DocId>,
    pub(crate) terms: HashMap<String, Vec<Posting>>,
    pub(crate) titleterms: HashMap<String, Vec<Posting>>,
    pub(crate) envversion: EnvVersion,
    pub(crate) objects: Map<String, Value>,
    pub(crate) objnames: Map<String, Value>,
    pub(crate) objtypes: Map<String, Value>,
}

impl SearchIndex {
    /// Normalize a parsed payload into the canonical store, rejecting
    /// inconsistent input outright: mismatched table lengths, postings that
    /// reference documents outside the table, non-numeric document keys.
    pub fn from_raw(raw: RawIndex) -> Result<Self> {
        let num_docs = raw.docnames.len();
        if raw.filenames.len() != num_docs {
            return Err(IndexError::TableMismatch {
                table: "filenames",
                expected: num_docs,
                actual: raw.filenames.len(),
            });
        }
        if raw.titles.len() != num_docs {
            return Err(IndexError::TableMismatch {
                table: "titles",
                expected: num_docs,
                actual: raw.titles.len(),
            });
        }
        let docs = raw
            .docnames
            .into_iter()
            .zip(raw.filenames)
            .zip(raw.titles)
            .map(|((docname, filename), title)| Document {
                docname,
                filename,
                title,
            })
            .collect();
        let terms = normalize_table(raw.terms)?;
        let titleterms = normalize_table(raw.titleterms)?;
        Self::from_parts(
            docs,
            terms,
            titleterms,
            raw.envversion,
            raw.objects,
            raw.objnames,
            raw.objtypes,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        docs: Vec<Document>,
        mut terms: HashMap<String, Vec<Posting>>,
        mut titleterms: HashMap<String, Vec<Posting>>,
        envversion: EnvVersion,
        objects: Map<String, Value>,
        objnames: Map<String, Value>,
        objtypes: Map<String, Value>,
    ) -> Result<Self> {
        let num_docs = docs.len();
        let mut docname_ids = HashMap::with_capacity(num_docs);
        for (id, doc) in docs.iter().enumerate() {
            if docname_ids.insert(doc.docname.clone(), id as DocId).is_some() {
                return Err(IndexError::DuplicateDoc(doc.docname.clone()));
            }
        }
        for (term, postings) in terms.iter_mut().chain(titleterms.iter_mut()) {
            postings.sort_by_key(|p| p.doc_id);
            postings.dedup_by(|cur, prev| {
                if cur.doc_id == prev.doc_id {
                    prev.weight += cur.weight;
                    true
                } else {
                    false
                }
            });
            if let Some(p) = postings.iter().find(|p| p.doc_id as usize >= num_docs) {
                return Err(IndexError::DanglingTerm {
                    term: term.clone(),
                    doc_id: p.doc_id,
                });
            }
        }
        tracing::debug!(
            num_docs,
            num_terms = terms.len(),
            num_titleterms = titleterms.len(),
            "normalized index tables"
        );
        Ok(Self {
            docs,
            docname_ids,
            terms,
            titleterms,
            envversion,
            objects,
            objnames,
            objtypes,
        })
    }

    /// Regenerate the interchange representation. A posting list whose
    /// weights are all 1.0 emits as an id list, otherwise as an id → weight
    /// object; the auxiliary tables pass through verbatim.
    pub fn to_raw(&self) -> RawIndex {
        RawIndex {
            docnames: self.docs.iter().map(|d| d.docname.clone()).collect(),
            filenames: self.docs.iter().map(|d| d.filename.clone()).collect(),
            titles: self.docs.iter().map(|d| d.title.clone()).collect(),
            terms: denormalize_table(&self.terms),
            titleterms: denormalize_table(&self.titleterms),
            objects: self.objects.clone(),
            objnames: self.objnames.clone(),
            objtypes: self.objtypes.clone(),
            envversion: self.envversion.clone(),
        }
    }

    /// Look up a document by id.
    pub fn doc(&self, id: DocId) -> Result<&Document> {
        self.docs.get(id as usize).ok_or(IndexError::OutOfRange {
            id,
            len: self.docs.len(),
        })
    }

    pub fn doc_id_for_docname(&self, docname: &str) -> Option<DocId> {
        self.docname_ids.get(docname).copied()
    }

    pub fn doc_id_for_filename(&self, filename: &str) -> Option<DocId> {
        self.docs
            .iter()
            .position(|d| d.filename == filename)
            .map(|i| i as DocId)
    }

    /// Exact-term body postings. Unknown terms are an empty slice, never an
    /// error.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.terms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exact-term title postings.
    pub fn title_postings(&self, term: &str) -> &[Posting] {
        self.titleterms.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn envversion(&self) -> &EnvVersion {
        &self.envversion
    }
}

fn normalize_table(table: BTreeMap<String, TermPostings>) -> Result<HashMap<String, Vec<Posting>>> {
    let mut out = HashMap::with_capacity(table.len());
    for (term, value) in table {
        let postings = match value {
            TermPostings::One(doc_id) => vec![Posting { doc_id, weight: 1.0 }],
            TermPostings::Many(ids) => ids
                .into_iter()
                .map(|doc_id| Posting { doc_id, weight: 1.0 })
                .collect(),
            TermPostings::Weighted(weights) => {
                let mut postings = Vec::with_capacity(weights.len());
                for (key, weight) in weights {
                    let doc_id = key.parse::<DocId>().map_err(|_| IndexError::BadDocKey {
                        term: term.clone(),
                        key: key.clone(),
                    })?;
                    postings.push(Posting { doc_id, weight });
                }
                postings
            }
        };
        out.insert(term, postings);
    }
    Ok(out)
}

fn denormalize_table(table: &HashMap<String, Vec<Posting>>) -> BTreeMap<String, TermPostings> {
    table
        .iter()
        .map(|(term, postings)| {
            let value = if postings.iter().all(|p| p.weight == 1.0) {
                TermPostings::Many(postings.iter().map(|p| p.doc_id).collect())
            } else {
                TermPostings::Weighted(
                    postings
                        .iter()
                        .map(|p| (p.doc_id.to_string(), p.weight))
                        .collect(),
                )
            };
            (term.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_terms(terms: BTreeMap<String, TermPostings>) -> RawIndex {
        RawIndex {
            docnames: vec!["guide/intro".into(), "guide/usage".into()],
            filenames: vec!["guide/intro.rst".into(), "guide/usage.rst".into()],
            titles: vec!["Introduction".into(), "Usage".into()],
            terms,
            titleterms: BTreeMap::new(),
            objects: Map::new(),
            objnames: Map::new(),
            objtypes: Map::new(),
            envversion: EnvVersion::Number(1),
        }
    }

    #[test]
    fn single_id_normalizes_to_unit_weight() {
        let mut terms = BTreeMap::new();
        terms.insert("intro".to_string(), TermPostings::One(1));
        let index = SearchIndex::from_raw(raw_with_terms(terms)).unwrap();
        assert_eq!(index.postings("intro"), &[Posting { doc_id: 1, weight: 1.0 }]);
    }

    #[test]
    fn duplicate_ids_merge_and_sort() {
        let mut terms = BTreeMap::new();
        terms.insert("usag".to_string(), TermPostings::Many(vec![1, 0, 1]));
        let index = SearchIndex::from_raw(raw_with_terms(terms)).unwrap();
        assert_eq!(
            index.postings("usag"),
            &[
                Posting { doc_id: 0, weight: 1.0 },
                Posting { doc_id: 1, weight: 2.0 },
            ]
        );
    }

    #[test]
    fn dangling_posting_rejected() {
        let mut terms = BTreeMap::new();
        terms.insert("ghost".to_string(), TermPostings::Many(vec![2]));
        let err = SearchIndex::from_raw(raw_with_terms(terms)).unwrap_err();
        assert!(matches!(err, IndexError::DanglingTerm { doc_id: 2, .. }));
    }

    #[test]
    fn duplicate_docname_rejected() {
        let mut raw = raw_with_terms(BTreeMap::new());
        raw.docnames[1] = raw.docnames[0].clone();
        let err = SearchIndex::from_raw(raw).unwrap_err();
        assert!(matches!(err, IndexError::DuplicateDoc(_)));
    }

    #[test]
    fn weighted_table_roundtrips_as_object() {
        let mut terms = BTreeMap::new();
        let mut weights = BTreeMap::new();
        weights.insert("0".to_string(), 2.0);
        weights.insert("1".to_string(), 1.0);
        terms.insert("tile".to_string(), TermPostings::Weighted(weights));
        let index = SearchIndex::from_raw(raw_with_terms(terms)).unwrap();
        let raw = index.to_raw();
        assert!(matches!(raw.terms["tile"], TermPostings::Weighted(_)));
    }
}
