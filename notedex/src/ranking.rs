//! Result ordering by a single sort key.
//!
//! Each entry is decorated with its key once, sorted with a stable comparator,
//! then undecorated. Equal keys keep their input order in both directions, so
//! identical calls always paginate identically.
//!
//! `Relevance` is not a sortable field here: the matcher's score order (or the
//! filter output order when there was no free text) is already authoritative.

use crate::fuzzy::MatchResult;
use crate::interface::{SortKey, SortOrder};
use crate::models::Document;
use chrono::{DateTime, Utc};
use nucleo_matcher::chars;
use std::cmp::Ordering;

/// Decorated sort key. Unset numeric fields have already been mapped to 0.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Count(u64),
    Time(DateTime<Utc>),
    /// Accent- and case-folded text first, raw text as the tiebreak.
    Text { folded: String, raw: String },
}

impl SortValue {
    fn of(doc: &Document, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Relevance => None,
            SortKey::Date => Some(SortValue::Time(doc.created_at)),
            SortKey::Rating => Some(SortValue::Number(doc.rating_or_zero())),
            SortKey::Downloads => Some(SortValue::Count(doc.downloads)),
            SortKey::Views => Some(SortValue::Count(doc.views)),
            SortKey::FileSize => Some(SortValue::Count(doc.file_size_or_zero())),
            SortKey::Title => Some(SortValue::Text {
                folded: fold_title(&doc.title),
                raw: doc.title.clone(),
            }),
        }
    }

    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Count(a), SortValue::Count(b)) => a.cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            (
                SortValue::Text { folded: fa, raw: ra },
                SortValue::Text { folded: fb, raw: rb },
            ) => collate(fa, fb, ra, rb),
            // Every entry is decorated with the same key.
            _ => Ordering::Equal,
        }
    }
}

/// Strip Latin diacritics, then lower-case, so "Émile" files under "e".
///
/// This is character folding, not locale collation: ligatures such as "ß" or
/// "æ" are not expanded and non-Latin scripts keep code point order.
fn fold_title(title: &str) -> String {
    title.chars().map(chars::normalize).flat_map(char::to_lowercase).collect()
}

/// Dictionary-style order: accent- and case-insensitive first; among variants
/// that fold together the lower-case spelling sorts first
/// ("apple" < "Apple" < "banana").
fn collate(folded_a: &str, folded_b: &str, raw_a: &str, raw_b: &str) -> Ordering {
    folded_a.cmp(folded_b).then_with(|| raw_b.cmp(raw_a))
}

/// Sort `entries` in place by `key` and `order`. `Relevance` leaves them untouched.
pub fn rank(entries: &mut Vec<MatchResult<'_>>, key: SortKey, order: SortOrder) {
    if key == SortKey::Relevance || entries.len() < 2 {
        return;
    }

    let mut decorated: Vec<(SortValue, MatchResult<'_>)> = entries
        .drain(..)
        .filter_map(|entry| SortValue::of(entry.document, key).map(|value| (value, entry)))
        .collect();

    // slice::sort_by is stable; reversing the comparator (not the output)
    // keeps equal keys in input order for descending sorts too.
    decorated.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Asc => a.compare(b),
        SortOrder::Desc => b.compare(a),
    });

    entries.extend(decorated.into_iter().map(|(_, entry)| entry));
}

/// Convenience for plain document slices.
pub fn rank_documents<'a>(documents: &'a [Document], key: SortKey, order: SortOrder) -> Vec<&'a Document> {
    let mut entries: Vec<MatchResult<'a>> = documents.iter().map(MatchResult::unscored).collect();
    rank(&mut entries, key, order);
    entries.into_iter().map(|entry| entry.document).collect()
}
