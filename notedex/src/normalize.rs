//! Query normalization
//!
//! Lower-cases and trims free text, expands course-code shorthands, and rewrites
//! the boolean words the matcher understands: `or` becomes the disjunction
//! marker, `and` becomes a plain space (conjunction is the matcher's default).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Splits a normalized query into alternatives for the matcher.
pub const DISJUNCTION_MARKER: char = '|';

/// Queries shorter than this (after trimming) impose no text constraint.
pub const MIN_QUERY_LEN: usize = 2;

/// Whole-word shorthand -> full subject term. Keys are lowercase.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("acct", "accounting"),
    ("ai", "artificial intelligence"),
    ("anat", "anatomy"),
    ("biochem", "biochemistry"),
    ("bio", "biology"),
    ("calc", "calculus"),
    ("chem", "chemistry"),
    ("compsci", "computer science"),
    ("cs", "computer science"),
    ("diffeq", "differential equations"),
    ("econ", "economics"),
    ("ee", "electrical engineering"),
    ("fin", "finance"),
    ("hist", "history"),
    ("linalg", "linear algebra"),
    ("mech", "mechanical engineering"),
    ("mktg", "marketing"),
    ("ml", "machine learning"),
    ("orgo", "organic chemistry"),
    ("pharm", "pharmacology"),
    ("philo", "philosophy"),
    ("phys", "physics"),
    ("psych", "psychology"),
    ("soc", "sociology"),
    ("stat", "statistics"),
    ("stats", "statistics"),
];

static ABBREVIATION_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ABBREVIATIONS.iter().copied().collect());

static ABBREVIATION_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = ABBREVIATIONS
        .iter()
        .map(|(short, _)| regex::escape(short))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("abbreviation table forms a valid regex")
});

static OR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bor\b").expect("valid regex"));
static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\band\b").expect("valid regex"));

/// Normalize raw query text for matching.
///
/// Returns `None` only when the query is shorter than [`MIN_QUERY_LEN`]
/// characters after trimming. A query made only of boolean words normalizes to
/// an empty or marker-only string, which matches nothing and so falls through
/// to raw substring containment.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let expanded = ABBREVIATION_RE.replace_all(&lowered, |caps: &regex::Captures| {
        let short = &caps[0];
        ABBREVIATION_MAP.get(short).copied().unwrap_or(short).to_string()
    });
    let with_or = OR_RE.replace_all(&expanded, " | ");
    let with_and = AND_RE.replace_all(&with_or, " ");

    Some(with_and.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Split a normalized query on the disjunction marker, dropping segments
/// shorter than `min_len`.
pub fn split_alternatives(normalized: &str, min_len: usize) -> Vec<&str> {
    normalized
        .split(DISJUNCTION_MARKER)
        .map(str::trim)
        .filter(|segment| segment.chars().count() >= min_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize_query ───────────────────────────────────────────

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_query("  Organic Reactions  ").as_deref(), Some("organic reactions"));
    }

    #[test]
    fn test_short_query_is_none() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(" a "), None);
    }

    #[test]
    fn test_two_chars_is_enough() {
        assert_eq!(normalize_query("db").as_deref(), Some("db"));
    }

    #[test]
    fn test_expands_abbreviation() {
        assert_eq!(normalize_query("calc").as_deref(), Some("calculus"));
        assert_eq!(normalize_query("CALC notes").as_deref(), Some("calculus notes"));
    }

    #[test]
    fn test_abbreviation_is_whole_word_only() {
        assert_eq!(normalize_query("calculator").as_deref(), Some("calculator"));
        assert_eq!(normalize_query("statics").as_deref(), Some("statics"));
    }

    #[test]
    fn test_expands_both_stat_forms() {
        assert_eq!(normalize_query("stat").as_deref(), Some("statistics"));
        assert_eq!(normalize_query("stats").as_deref(), Some("statistics"));
    }

    #[test]
    fn test_or_becomes_marker() {
        assert_eq!(normalize_query("calc OR chem").as_deref(), Some("calculus | chemistry"));
        assert_eq!(normalize_query("physics or biology").as_deref(), Some("physics | biology"));
    }

    #[test]
    fn test_and_becomes_space() {
        assert_eq!(normalize_query("linear AND algebra").as_deref(), Some("linear algebra"));
    }

    #[test]
    fn test_or_inside_word_untouched() {
        assert_eq!(normalize_query("orbital theory").as_deref(), Some("orbital theory"));
        assert_eq!(normalize_query("android").as_deref(), Some("android"));
    }

    #[test]
    fn test_only_boolean_words_leave_no_pattern() {
        assert_eq!(normalize_query("and").as_deref(), Some(""));
        assert_eq!(normalize_query("OR").as_deref(), Some("|"));
        assert_eq!(normalize_query("and or and").as_deref(), Some("|"));
        assert_eq!(normalize_query("x or").as_deref(), Some("x |"));
        assert!(split_alternatives("x |", MIN_QUERY_LEN).is_empty());
    }

    // ── split_alternatives ────────────────────────────────────────

    #[test]
    fn test_split_alternatives() {
        assert_eq!(split_alternatives("calculus | chemistry", 2), vec!["calculus", "chemistry"]);
        assert_eq!(split_alternatives("calculus", 2), vec!["calculus"]);
        assert_eq!(split_alternatives("x | chemistry |", 2), vec!["chemistry"]);
    }

    // ── table checks ──────────────────────────────────────────────

    #[test]
    fn test_abbreviation_table_is_well_formed() {
        let mut seen = std::collections::HashSet::new();
        for (short, full) in ABBREVIATIONS {
            assert_eq!(*short, short.to_lowercase(), "key {short} must be lowercase");
            assert!(seen.insert(*short), "duplicate key {short}");
            assert!(!full.is_empty());
            for word in full.split_whitespace() {
                assert!(
                    !ABBREVIATION_MAP.contains_key(word),
                    "expansion {full} contains shorthand {word}"
                );
            }
        }
    }
}
