//! Notedex - document discovery for a catalogue of academic notes
//!
//! Answers "find notes matching Q under filters F, ranked by S, paginated" over
//! an in-memory snapshot supplied by the caller. The pipeline is:
//! normalize -> fuzzy match (or substring fallback) -> filter -> rank -> paginate.
//!
//! Storage, transport, and authentication belong to the caller.

pub mod cache;
pub(crate) mod candidate;
pub mod config;
mod engine;
pub mod filter;
pub mod fuzzy;
pub mod interface;
pub mod models;
pub mod normalize;
pub mod paginate;
pub mod ranking;
pub mod search;

pub use config::{FieldWeights, MatcherConfig, SearchConfig};
pub use engine::SearchEngine;
pub use interface::*;
pub use models::{Document, FileType, Uploader};

/// Search `documents` with the default engine and a transient index.
pub fn search(documents: &[Document], query: &QuerySpec) -> Result<ResultPage> {
    search::search_with(&SearchConfig::default(), None, documents, query)
}

/// Suggestions for `query` with the default engine.
pub fn suggest(query: &str, documents: &[Document], limit: usize) -> Vec<String> {
    search::suggest(query, documents, limit)
}
