//! Serde model of the serialized index object a documentation generator
//! emits. Parsing keeps the generator's polymorphic value shapes; the
//! normalized form lives in [`crate::index`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::index::DocId;

/// Build metadata: older emitters stamp a bare version number, newer ones an
/// environment tag string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvVersion {
    Number(u64),
    Tag(String),
}

/// The value shapes a `terms`/`titleterms` entry can take on the wire: a
/// bare document id when a term occurs in a single document, a list of ids,
/// or a map from id (decimal string key) to occurrence weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermPostings {
    One(DocId),
    Many(Vec<DocId>),
    Weighted(BTreeMap<String, f32>),
}

/// The serialized index object. `docnames`, `filenames`, and `titles` are
/// parallel tables indexed by document id. The `objects`/`objnames`/
/// `objtypes` API-symbol tables are carried opaquely and preserved on
/// re-serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIndex {
    pub docnames: Vec<String>,
    pub filenames: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    pub terms: BTreeMap<String, TermPostings>,
    #[serde(default)]
    pub titleterms: BTreeMap<String, TermPostings>,
    #[serde(default)]
    pub objects: Map<String, Value>,
    #[serde(default)]
    pub objnames: Map<String, Value>,
    #[serde(default)]
    pub objtypes: Map<String, Value>,
    pub envversion: EnvVersion,
}
