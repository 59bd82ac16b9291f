//! Read-only term index store for generated documentation sites.
//!
//! A documentation generator emits a search index for its pages: parallel
//! docname/filename/title tables plus term → document mappings for body and
//! title text. `docdex` loads that payload into one immutable store,
//! answers term and document lookups, and serializes the store back out.
//! The store never changes after construction, so it can be shared across
//! threads without locking.
//!
//! ```no_run
//! use docdex::{persist, SearchConfig};
//!
//! # fn main() -> docdex::Result<()> {
//! let index = persist::load_json_file("searchindex.js")?;
//! for hit in index.search("ndvi", &SearchConfig::default()) {
//!     println!("{} ({})", hit.title, hit.docname);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod format;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;

pub use builder::IndexBuilder;
pub use error::{IndexError, Result};
pub use format::{EnvVersion, RawIndex, TermPostings};
pub use index::{DocId, Document, Posting, SearchIndex};
pub use query::{MatchMode, SearchConfig, SearchHit};
