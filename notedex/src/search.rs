//! Search orchestration: match, filter, rank, paginate.
//!
//! The pipeline borrows the caller's snapshot throughout and only clones the
//! documents that land on the returned page.

use crate::cache::IndexCache;
use crate::config::SearchConfig;
use crate::filter::FilterSet;
use crate::fuzzy::{substring_fallback, FuzzyIndex, MatchResult};
use crate::interface::{QuerySpec, ResultPage, Result, SortKey};
use crate::models::Document;
use crate::normalize::{normalize_query, MIN_QUERY_LEN};
use crate::paginate::paginate;
use crate::ranking::rank;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Which strategy produced the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Fuzzy,
    Fallback,
    Unconstrained,
}

/// Run one search over `documents`.
///
/// With `cache` set, the fuzzy index is taken from (or published to) the shared
/// cache; otherwise a transient index is built for this call only.
#[instrument(skip_all, fields(documents = documents.len(), page = query.page, sort = ?query.sort_by))]
pub fn search_with(
    config: &SearchConfig,
    cache: Option<&IndexCache>,
    documents: &[Document],
    query: &QuerySpec,
) -> Result<ResultPage> {
    query.validate()?;
    // Compiled up front so a malformed date fails even when nothing would match.
    let filters = FilterSet::compile(&query.filters)?;
    let page_size = resolve_page_size(config, query.limit);

    let (stage, working) = match_stage(config, cache, documents, query.search.as_deref());
    debug!(?stage, matched = working.len(), "text stage complete");

    let mut working = filters.apply(working);
    debug!(remaining = working.len(), "filters applied");

    if query.sort_by != SortKey::Relevance {
        rank(&mut working, query.sort_by, query.sort_order);
    }

    let ordered: Vec<&Document> = working.iter().map(|entry| entry.document).collect();
    Ok(paginate(&ordered, query.page, page_size))
}

fn resolve_page_size(config: &SearchConfig, limit: Option<usize>) -> usize {
    match limit {
        None => config.default_page_size,
        Some(limit) => match config.max_page_size {
            Some(max) if limit > max => {
                warn!(limit, max, "page size clamped by configured max_page_size");
                max
            }
            _ => limit,
        },
    }
}

fn match_stage<'a>(
    config: &SearchConfig,
    cache: Option<&IndexCache>,
    documents: &'a [Document],
    search: Option<&str>,
) -> (Stage, Vec<MatchResult<'a>>) {
    let raw = search.map(str::trim).unwrap_or_default();
    let Some(normalized) = normalize_query(raw) else {
        return (
            Stage::Unconstrained,
            documents.iter().map(MatchResult::unscored).collect(),
        );
    };

    let index = match cache {
        Some(cache) => cache.index_for(documents),
        None => Arc::new(FuzzyIndex::build(config.matcher.clone(), documents)),
    };
    let matched: Vec<MatchResult<'a>> = index
        .search(&normalized)
        .into_iter()
        .filter_map(|hit| {
            documents.get(hit.position).map(|document| MatchResult {
                document,
                score: Some(hit.score),
            })
        })
        .collect();

    if !matched.is_empty() {
        return (Stage::Fuzzy, matched);
    }
    debug!(query = raw, "no fuzzy hits, trying substring containment");
    (Stage::Fallback, substring_fallback(documents, raw))
}

/// Distinct title, subject, course, professor, and tag values that contain
/// `query` case-insensitively, in scan order, at most `limit` of them.
pub fn suggest(query: &str, documents: &[Document], limit: usize) -> Vec<String> {
    if limit == 0 || query.trim().chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    let candidates = documents.iter().flat_map(|doc| {
        [
            Some(doc.title.as_str()),
            Some(doc.subject.as_str()),
            doc.course.as_deref(),
            doc.professor.as_deref(),
        ]
        .into_iter()
        .flatten()
        .chain(doc.tags.iter().map(String::as_str))
    });

    for text in candidates {
        if text.to_lowercase().contains(&needle) && seen.insert(text) {
            suggestions.push(text.to_string());
            if suggestions.len() == limit {
                break;
            }
        }
    }
    suggestions
}
