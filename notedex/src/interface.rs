//! Notedex Interface Definition
//!
//! Request/response records exchanged with the HTTP layer, the error type,
//! and the service trait the engine implements. Transport encoding is the
//! caller's business; these types only carry serde derives.

use crate::models::{Document, FileType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordering criterion for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Matcher order when free text is present, filter order otherwise.
    #[default]
    Relevance,
    Date,
    Rating,
    Downloads,
    Views,
    Title,
    FileSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// Structured predicates. Every field is optional; `None` means no constraint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub professor: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    /// Any-of-any: passes when some document tag contains some requested tag.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub university: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`, inclusive.
    #[serde(default)]
    pub date_from: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`, inclusive (a bare date covers the whole day).
    #[serde(default)]
    pub date_to: Option<String>,
}

/// A full search request: text, filters, sort, and pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(flatten)]
    pub filters: Filters,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// 1-based.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: usize,
    /// Falls back to the engine's configured page size when absent.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

fn default_page() -> usize {
    1
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search: None,
            filters: Filters::default(),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
            limit: None,
        }
    }
}

impl QuerySpec {
    /// Free-text query with every other field defaulted.
    pub fn text(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn paged(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = Some(limit);
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}

/// One page of results plus navigation metadata.
///
/// Invariants: `total_pages = ceil(total / page_size)` (0 when `total` is 0),
/// `has_next = page < total_pages`, `has_prev = page > 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub notes: Vec<Document>,
    /// Match count before pagination.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Error type for Notedex operations
#[derive(Debug, Error)]
pub enum NotedexError {
    #[error("Invalid {field}: {value:?} is not a date (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotedexError>;

impl From<validator::ValidationErrors> for NotedexError {
    fn from(e: validator::ValidationErrors) -> Self {
        NotedexError::InvalidQuery(e.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The operations exposed to the HTTP layer. Every call works on the snapshot
/// it is handed; nothing is retained between calls except an optional index cache.
pub trait NoteSearchApi: Send + Sync {
    /// Find, filter, rank, and paginate `documents` for `query`.
    fn search(&self, documents: &[Document], query: &QuerySpec) -> Result<ResultPage>;

    /// Distinct field values containing `query`, at most `limit`, in scan order.
    fn suggest(&self, query: &str, documents: &[Document], limit: usize) -> Vec<String>;
}
