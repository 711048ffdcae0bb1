//! Indexed document with memoized derived text.
//!
//! Module isolation ensures no code outside this module can mutate the raw
//! field text after construction, so the `OnceLock` caches can never go stale.

use crate::models::Document;
use std::sync::OnceLock;

/// One searchable field: raw text plus lazily derived match inputs.
#[derive(Debug, Clone)]
pub(crate) struct FieldText {
    raw: String,
    chars_lower: OnceLock<Vec<char>>,
    norm: OnceLock<f64>,
}

impl FieldText {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            chars_lower: OnceLock::new(),
            norm: OnceLock::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased characters, computed on first match and reused after.
    pub(crate) fn chars_lower(&self) -> &[char] {
        self.chars_lower
            .get_or_init(|| self.raw.to_lowercase().chars().collect())
    }

    /// Field-length norm: `1 / sqrt(word count)`, rounded to three decimals.
    /// Long fields weigh less than short ones for the same match quality.
    pub(crate) fn norm(&self) -> f64 {
        *self.norm.get_or_init(|| {
            let words = self.raw.split_whitespace().count().max(1) as f64;
            (1000.0 / words.sqrt()).round() / 1000.0
        })
    }
}

/// Field slots in weight order: title, description, subject, course, professor.
pub(crate) const TEXT_FIELD_COUNT: usize = 5;

/// A document as the fuzzy index sees it. `position` is the document's index
/// in the snapshot the index was built from.
#[derive(Debug, Clone)]
pub(crate) struct IndexedDocument {
    pub position: usize,
    fields: [Option<FieldText>; TEXT_FIELD_COUNT],
    tags: Vec<FieldText>,
}

impl IndexedDocument {
    pub(crate) fn new(position: usize, document: &Document) -> Self {
        Self {
            position,
            fields: document
                .text_fields()
                .map(|field| field.filter(|text| !text.trim().is_empty()).map(FieldText::new)),
            tags: document
                .tags
                .iter()
                .filter(|tag| !tag.trim().is_empty())
                .map(|tag| FieldText::new(tag))
                .collect(),
        }
    }

    pub(crate) fn fields(&self) -> &[Option<FieldText>; TEXT_FIELD_COUNT] {
        &self.fields
    }

    pub(crate) fn tags(&self) -> &[FieldText] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_chars_lower_memoized() {
        let field = FieldText::new("Intro To Calculus");
        let first = field.chars_lower().as_ptr();
        let second = field.chars_lower().as_ptr();
        assert_eq!(first, second);
        assert_eq!(field.chars_lower().iter().collect::<String>(), "intro to calculus");
    }

    #[test]
    fn test_norm_by_word_count() {
        assert_eq!(FieldText::new("Math").norm(), 1.0);
        assert_eq!(FieldText::new("Linear Algebra Review Session").norm(), 0.5);
        assert_eq!(FieldText::new("Intro to Calculus").norm(), 0.577);
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let mut doc = Document::new("n1", "Title", "Subject", Utc::now());
        doc.description = Some("   ".to_string());
        doc.tags = vec!["exam".to_string(), "".to_string()];

        let indexed = IndexedDocument::new(3, &doc);
        assert_eq!(indexed.position, 3);
        assert!(indexed.fields()[1].is_none());
        assert_eq!(indexed.fields()[0].as_ref().map(FieldText::raw), Some("Title"));
        assert_eq!(indexed.tags().len(), 1);
    }
}
