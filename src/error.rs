use thiserror::Error;

use crate::index::DocId;

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("document id {id} out of range (index holds {len} documents)")]
    OutOfRange { id: DocId, len: usize },

    #[error("{table} table holds {actual} entries, expected {expected} to match docnames")]
    TableMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("term {term:?} references missing document id {doc_id}")]
    DanglingTerm { term: String, doc_id: DocId },

    #[error("term {term:?} carries non-numeric document key {key:?}")]
    BadDocKey { term: String, key: String },

    #[error("duplicate docname {0:?}")]
    DuplicateDoc(String),

    #[error("incompatible snapshot version {actual}, expected {expected}")]
    SnapshotVersion { expected: u32, actual: u32 },

    #[error("malformed index payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
