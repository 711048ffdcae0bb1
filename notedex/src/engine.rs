//! `SearchEngine`: configuration plus an optional shared index.

use crate::cache::IndexCache;
use crate::config::SearchConfig;
use crate::interface::{NoteSearchApi, QuerySpec, Result, ResultPage};
use crate::models::Document;
use crate::search;

/// Thread-safe search engine. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    cache: Option<IndexCache>,
}

impl SearchEngine {
    /// Create an engine that builds a transient index per call.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: None,
        })
    }

    /// Create an engine that reuses one index across calls on the same snapshot.
    pub fn with_shared_index(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let cache = IndexCache::new(config.matcher.clone());
        Ok(Self {
            config,
            cache: Some(cache),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The shared index cache, if enabled.
    pub fn index_cache(&self) -> Option<&IndexCache> {
        self.cache.as_ref()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            config: SearchConfig::default(),
            cache: None,
        }
    }
}

impl NoteSearchApi for SearchEngine {
    fn search(&self, documents: &[Document], query: &QuerySpec) -> Result<ResultPage> {
        search::search_with(&self.config, self.cache.as_ref(), documents, query)
    }

    fn suggest(&self, query: &str, documents: &[Document], limit: usize) -> Vec<String> {
        search::suggest(query, documents, limit)
    }
}
