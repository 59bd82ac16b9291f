//! Load and serialize the store: the generator's JSON interchange format
//! (optionally wrapped in its `Search.setIndex(...)` call) and a compact
//! binary snapshot of the normalized tables for fast reload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::format::{EnvVersion, RawIndex};
use crate::index::{Document, Posting, SearchIndex};

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    docs: Vec<Document>,
    terms: HashMap<String, Vec<Posting>>,
    titleterms: HashMap<String, Vec<Posting>>,
    env: SnapshotEnv,
    /// The auxiliary symbol tables are schemaless and travel as JSON text;
    /// the binary codec cannot carry free-form values.
    aux: String,
}

#[derive(Serialize, Deserialize)]
enum SnapshotEnv {
    Number(u64),
    Tag(String),
}

#[derive(Serialize, Deserialize, Default)]
struct AuxTables {
    objects: Map<String, Value>,
    objnames: Map<String, Value>,
    objtypes: Map<String, Value>,
}

/// Strip the generator's `Search.setIndex(...)` wrapper, if present.
fn strip_wrapper(payload: &str) -> &str {
    let trimmed = payload.trim();
    match trimmed.strip_prefix("Search.setIndex(") {
        Some(rest) => rest.trim_end().trim_end_matches(';').trim_end_matches(')'),
        None => trimmed,
    }
}

/// Parse an interchange payload into a validated store. Malformed input
/// fails the load outright; nothing is partially accepted.
pub fn load_json_str(payload: &str) -> Result<SearchIndex> {
    let raw: RawIndex = serde_json::from_str(strip_wrapper(payload))?;
    let index = SearchIndex::from_raw(raw)?;
    tracing::info!(
        num_docs = index.len(),
        num_terms = index.num_terms(),
        "loaded search index"
    );
    Ok(index)
}

pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<SearchIndex> {
    let mut buf = String::new();
    File::open(path)?.read_to_string(&mut buf)?;
    load_json_str(&buf)
}

pub fn to_json_string(index: &SearchIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(&index.to_raw())?)
}

pub fn save_json_file<P: AsRef<Path>>(path: P, index: &SearchIndex) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(to_json_string(index)?.as_bytes())?;
    Ok(())
}

pub fn save_snapshot<P: AsRef<Path>>(path: P, index: &SearchIndex) -> Result<()> {
    let aux = AuxTables {
        objects: index.objects.clone(),
        objnames: index.objnames.clone(),
        objtypes: index.objtypes.clone(),
    };
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        docs: index.docs.clone(),
        terms: index.terms.clone(),
        titleterms: index.titleterms.clone(),
        env: match index.envversion() {
            EnvVersion::Number(n) => SnapshotEnv::Number(*n),
            EnvVersion::Tag(t) => SnapshotEnv::Tag(t.clone()),
        },
        aux: serde_json::to_string(&aux)?,
    };
    let f = File::create(path)?;
    bincode::serialize_into(BufWriter::new(f), &snapshot)?;
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<SearchIndex> {
    let f = File::open(path)?;
    let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(f))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(IndexError::SnapshotVersion {
            expected: SNAPSHOT_VERSION,
            actual: snapshot.version,
        });
    }
    let aux: AuxTables = serde_json::from_str(&snapshot.aux)?;
    let env = match snapshot.env {
        SnapshotEnv::Number(n) => EnvVersion::Number(n),
        SnapshotEnv::Tag(t) => EnvVersion::Tag(t),
    };
    let index = SearchIndex::from_parts(
        snapshot.docs,
        snapshot.terms,
        snapshot.titleterms,
        env,
        aux.objects,
        aux.objnames,
        aux.objtypes,
    )?;
    tracing::info!(
        num_docs = index.len(),
        num_terms = index.num_terms(),
        "loaded snapshot"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_stripping() {
        assert_eq!(strip_wrapper("Search.setIndex({\"a\":1})"), "{\"a\":1}");
        assert_eq!(strip_wrapper("Search.setIndex({\"a\":1});\n"), "{\"a\":1}");
        assert_eq!(strip_wrapper("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn bare_and_wrapped_payloads_parse_identically() {
        let body = r#"{"docnames":["a"],"filenames":["a.rst"],"titles":["A"],"terms":{"x":0},"envversion":1}"#;
        let bare = load_json_str(body).unwrap();
        let wrapped = load_json_str(&format!("Search.setIndex({body});")).unwrap();
        assert_eq!(bare.len(), wrapped.len());
        assert_eq!(bare.postings("x"), wrapped.postings("x"));
    }
}
