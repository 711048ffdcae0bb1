//! Weighted multi-field fuzzy matcher
//!
//! Each field is scored by approximate substring search: the fewest edits
//! needed to make the pattern appear somewhere in the field, divided by the
//! pattern length, plus a proximity penalty for how far from the start of the
//! field the match begins. A field matches when that score is within the
//! configured threshold. Field scores combine multiplicatively, each raised to
//! its weight times the field-length norm, so lower is better and documents
//! matching in more (or heavier) fields rank first.

use crate::candidate::{FieldText, IndexedDocument};
use crate::config::MatcherConfig;
use crate::models::Document;
use crate::normalize::split_alternatives;
use rayon::prelude::*;

/// Stand-in for a perfect field score so it still scales with the field's weight.
const PERFECT_SCORE: f64 = f64::EPSILON;

/// A matched document. `score` is distance-style (lower is better) and absent
/// when the document entered the result set without a fuzzy match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub document: &'a Document,
    pub score: Option<f64>,
}

impl<'a> MatchResult<'a> {
    pub fn unscored(document: &'a Document) -> Self {
        Self {
            document,
            score: None,
        }
    }
}

/// Position/score pair produced by [`FuzzyIndex::search`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexMatch {
    /// Index into the snapshot the index was built from.
    pub position: usize,
    pub score: f64,
}

/// In-memory approximate-match index over one document snapshot.
#[derive(Debug)]
pub struct FuzzyIndex {
    config: MatcherConfig,
    documents: Vec<IndexedDocument>,
}

impl FuzzyIndex {
    /// Create an empty index with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            documents: Vec::new(),
        }
    }

    /// Build an index over `documents` in one step.
    pub fn build(config: MatcherConfig, documents: &[Document]) -> Self {
        let mut index = Self::new(config);
        index.build_index(documents);
        index
    }

    /// Replace the working set. Nothing from a previous build survives.
    /// Lower-casing and norms are derived lazily on first match.
    pub fn build_index(&mut self, documents: &[Document]) {
        self.documents = documents
            .iter()
            .enumerate()
            .map(|(position, document)| IndexedDocument::new(position, document))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Score every indexed document against a normalized query.
    ///
    /// Results are ordered by ascending score; ties keep index order. Returns
    /// an empty vec for an empty query or an empty index. Segments separated by
    /// the disjunction marker are alternatives: a field scores the best of them.
    pub fn search(&self, normalized_query: &str) -> Vec<IndexMatch> {
        if self.documents.is_empty() {
            return Vec::new();
        }
        let patterns: Vec<Vec<char>> = split_alternatives(normalized_query, self.config.min_match_len)
            .into_iter()
            .map(|segment| segment.chars().collect())
            .collect();
        if patterns.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<IndexMatch> = self
            .documents
            .par_iter()
            .filter_map(|doc| {
                score_document(doc, &patterns, &self.config).map(|score| IndexMatch {
                    position: doc.position,
                    score,
                })
            })
            .collect();

        // Stable sort by score; position breaks exact ties deterministically.
        matches.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        matches
    }
}

/// Combined score for one document, or `None` if no field matched.
fn score_document(doc: &IndexedDocument, patterns: &[Vec<char>], config: &MatcherConfig) -> Option<f64> {
    let weights = [
        config.weights.title,
        config.weights.description,
        config.weights.subject,
        config.weights.course,
        config.weights.professor,
    ];

    let mut total = 1.0_f64;
    let mut matched_any = false;

    for (field, weight) in doc.fields().iter().zip(weights) {
        let Some(field) = field else { continue };
        if let Some(score) = best_field_score(field, patterns, config) {
            total *= weighted(score, weight, field.norm());
            matched_any = true;
        }
    }

    let best_tag = doc
        .tags()
        .iter()
        .filter_map(|tag| best_field_score(tag, patterns, config).map(|score| (score, tag.norm())))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((score, norm)) = best_tag {
        total *= weighted(score, config.weights.tags, norm);
        matched_any = true;
    }

    matched_any.then_some(total)
}

fn weighted(score: f64, weight: f64, norm: f64) -> f64 {
    let base = if score == 0.0 { PERFECT_SCORE } else { score };
    base.powf(weight * norm)
}

/// Best score of any alternative pattern against one field.
fn best_field_score(field: &FieldText, patterns: &[Vec<char>], config: &MatcherConfig) -> Option<f64> {
    patterns
        .iter()
        .filter_map(|pattern| approximate_score(pattern, field.chars_lower(), config.threshold, config.distance))
        .min_by(|a, b| a.total_cmp(b))
}

/// Approximate substring score of `pattern` within `text`, both lower-cased.
///
/// Score = edits / pattern length + start offset / `distance` (with `distance`
/// of 0, any offset costs a full point). Returns the best score if it is
/// within `threshold`, `None` otherwise.
pub(crate) fn approximate_score(pattern: &[char], text: &[char], threshold: f64, distance: usize) -> Option<f64> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }
    let max_errors = (threshold * m as f64).floor() as usize;
    if m > text.len() + max_errors {
        return None;
    }

    let occurrences = approximate_occurrences(pattern, text, max_errors)?;

    occurrences
        .into_iter()
        .map(|(errors, start)| errors as f64 / m as f64 + proximity(start, distance))
        .filter(|score| *score <= threshold)
        .min_by(|a, b| a.total_cmp(b))
}

fn proximity(start: usize, distance: usize) -> f64 {
    if distance == 0 {
        if start == 0 {
            0.0
        } else {
            1.0
        }
    } else {
        start as f64 / distance as f64
    }
}

/// Sellers' approximate string matching: edit distance where the pattern may
/// begin anywhere in the text. Returns `(errors, start)` for every end
/// position within `max_errors`, or `None` when no alignment survives.
/// Rows are pruned as soon as every cell exceeds `max_errors`.
fn approximate_occurrences(pattern: &[char], text: &[char], max_errors: usize) -> Option<Vec<(usize, usize)>> {
    let n = text.len();

    // Row 0: the empty pattern matches before every text position for free.
    let mut prev: Vec<usize> = vec![0; n + 1];
    let mut prev_start: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];
    let mut curr_start = vec![0usize; n + 1];

    for (i, &pc) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        curr_start[0] = 0;
        let mut row_min = curr[0];

        for j in 1..=n {
            let cost = usize::from(text[j - 1] != pc);
            let substitute = prev[j - 1] + cost;
            let skip_pattern = prev[j] + 1;
            let skip_text = curr[j - 1] + 1;

            let (value, start) = if substitute <= skip_pattern && substitute <= skip_text {
                (substitute, prev_start[j - 1])
            } else if skip_pattern <= skip_text {
                (skip_pattern, prev_start[j])
            } else {
                (skip_text, curr_start[j - 1])
            };
            curr[j] = value;
            curr_start[j] = start;
            row_min = row_min.min(value);
        }

        if row_min > max_errors {
            return None;
        }

        std::mem::swap(&mut prev, &mut curr);
        std::mem::swap(&mut prev_start, &mut curr_start);
    }

    Some(
        prev.iter()
            .zip(prev_start.iter())
            .filter(|(errors, _)| **errors <= max_errors)
            .map(|(errors, start)| (*errors, *start))
            .collect(),
    )
}

/// Plain case-insensitive containment over title, description, subject,
/// course, professor, and tags. Unweighted and unscored; input order is kept.
pub fn substring_fallback<'a>(documents: &'a [Document], raw_query: &str) -> Vec<MatchResult<'a>> {
    let needle = raw_query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    documents
        .iter()
        .filter(|doc| {
            doc.text_fields()
                .into_iter()
                .flatten()
                .chain(doc.tags.iter().map(String::as_str))
                .any(|text| text.to_lowercase().contains(&needle))
        })
        .map(MatchResult::unscored)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn doc(id: &str, title: &str, subject: &str) -> Document {
        Document::new(id, title, subject, Utc::now())
    }

    fn index(docs: &[Document]) -> FuzzyIndex {
        FuzzyIndex::build(MatcherConfig::default(), docs)
    }

    // ── approximate_score ────────────────────────────────────────

    #[test]
    fn test_exact_at_start_scores_zero() {
        assert_eq!(approximate_score(&chars("math"), &chars("math"), 0.4, 100), Some(0.0));
    }

    #[test]
    fn test_exact_later_pays_proximity() {
        let score = approximate_score(&chars("calculus"), &chars("intro to calculus"), 0.4, 100);
        assert_eq!(score, Some(0.09));
    }

    #[test]
    fn test_swapped_tail_costs_one_edit() {
        // Dropping the stray "s" leaves "calculu", a prefix of the field: 1/8
        let score = approximate_score(&chars("calculsu"), &chars("calculus"), 0.4, 100).unwrap();
        assert!((score - 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_substitution_within_threshold() {
        let score = approximate_score(&chars("chemestry"), &chars("chemistry"), 0.4, 100).unwrap();
        assert!((score - 1.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_many_errors() {
        assert_eq!(approximate_score(&chars("calculus"), &chars("chemistry"), 0.4, 100), None);
    }

    #[test]
    fn test_far_match_exceeds_threshold() {
        let text = format!("{}calculus", "x".repeat(50));
        assert_eq!(approximate_score(&chars("calculus"), &chars(&text), 0.4, 100), None);
    }

    #[test]
    fn test_zero_distance_requires_start() {
        assert_eq!(approximate_score(&chars("calc"), &chars("calc one"), 0.4, 0), Some(0.0));
        assert_eq!(approximate_score(&chars("calc"), &chars("pre calc"), 0.4, 0), None);
    }

    #[test]
    fn test_zero_threshold_is_exact_only() {
        assert_eq!(approximate_score(&chars("bio"), &chars("bio"), 0.0, 100), Some(0.0));
        assert_eq!(approximate_score(&chars("bio"), &chars("bia"), 0.0, 100), None);
    }

    #[test]
    fn test_pattern_longer_than_text() {
        assert_eq!(approximate_score(&chars("organic chemistry"), &chars("chem"), 0.4, 100), None);
    }

    #[test]
    fn test_multi_word_pattern_tolerates_gap() {
        // "intro calculus" vs "intro to calculus": three inserted chars
        let score = approximate_score(&chars("intro calculus"), &chars("intro to calculus"), 0.4, 100).unwrap();
        assert!((score - 3.0 / 14.0).abs() < 1e-9);
    }

    // ── FuzzyIndex::search ───────────────────────────────────────

    #[test]
    fn test_empty_index() {
        assert!(index(&[]).search("calculus").is_empty());
    }

    #[test]
    fn test_empty_query() {
        let docs = vec![doc("1", "Intro to Calculus", "Math")];
        assert!(index(&docs).search("").is_empty());
        assert!(index(&docs).search("x").is_empty());
    }

    #[test]
    fn test_matches_title() {
        let docs = vec![
            doc("1", "Intro to Calculus", "Math"),
            doc("2", "Organic Chemistry Basics", "Chemistry"),
        ];
        let results = index(&docs).search("calculus");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 0);
    }

    #[test]
    fn test_more_fields_rank_first() {
        let mut strong = doc("strong", "Calculus Review", "Calculus");
        strong.course = Some("Calculus I".to_string());
        let weak = doc("weak", "Calculus Review", "Math");
        let docs = vec![weak, strong];

        let results = index(&docs).search("calculus");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 1);
        assert!(results[0].score < results[1].score);
    }

    #[test]
    fn test_title_outweighs_tag() {
        let mut tagged = doc("tagged", "Lecture Notes", "Math");
        tagged.tags = vec!["derivatives".to_string()];
        let titled = doc("titled", "Derivatives", "Math");
        let docs = vec![tagged, titled];

        let results = index(&docs).search("derivatives");
        assert_eq!(results[0].position, 1);
        assert_eq!(results[1].position, 0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let docs = vec![
            doc("a", "Thermodynamics", "Physics"),
            doc("b", "Thermodynamics", "Physics"),
            doc("c", "Thermodynamics", "Physics"),
        ];
        let positions: Vec<usize> = index(&docs).search("thermodynamics").iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_disjunction_matches_either() {
        let docs = vec![
            doc("1", "Intro to Calculus", "Math"),
            doc("2", "Organic Chemistry Basics", "Chemistry"),
            doc("3", "European History", "History"),
        ];
        let mut positions: Vec<usize> =
            index(&docs).search("calculus | chemistry").iter().map(|m| m.position).collect();
        positions.sort();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_without_disjunction_whole_string_must_fit() {
        let docs = vec![
            doc("1", "Intro to Calculus", "Math"),
            doc("2", "Organic Chemistry Basics", "Chemistry"),
        ];
        assert!(index(&docs).search("calculus chemistry").is_empty());
    }

    #[test]
    fn test_rebuild_replaces_working_set() {
        let mut idx = index(&[doc("1", "Intro to Calculus", "Math")]);
        assert_eq!(idx.search("calculus").len(), 1);

        idx.build_index(&[doc("2", "European History", "History")]);
        assert_eq!(idx.len(), 1);
        assert!(idx.search("calculus").is_empty());
        assert_eq!(idx.search("history").len(), 1);
    }

    #[test]
    fn test_optional_fields_are_searched() {
        let mut d = doc("1", "Week 3", "Math");
        d.professor = Some("Dr. Ramanujan".to_string());
        let results = index(&[d]).search("ramanujan");
        assert_eq!(results.len(), 1);
    }

    // ── substring_fallback ───────────────────────────────────────

    #[test]
    fn test_fallback_matches_any_field() {
        let mut tagged = doc("1", "Week 1", "Math");
        tagged.tags = vec!["Midterm-Prep".to_string()];
        let plain = doc("2", "Week 2", "Math");
        let docs = vec![tagged, plain];

        let results = substring_fallback(&docs, "midterm-p");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "1");
        assert_eq!(results[0].score, None);
    }

    #[test]
    fn test_fallback_keeps_input_order() {
        let docs = vec![doc("1", "Lab 2", "Bio"), doc("2", "Lab 1", "Bio")];
        let ids: Vec<&str> = substring_fallback(&docs, "LAB").iter().map(|m| m.document.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_fallback_no_match() {
        let docs = vec![doc("1", "Lab 2", "Bio")];
        assert!(substring_fallback(&docs, "xyzzy").is_empty());
    }
}
