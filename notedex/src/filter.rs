//! Structured filtering of the working set.
//!
//! Filters are compiled once per search (needles lower-cased, date bounds
//! parsed) and then evaluated as a conjunction against each document.
//! Evaluation preserves input order.

use crate::fuzzy::MatchResult;
use crate::interface::{Filters, NotedexError, Result};
use crate::models::{Document, FileType};
use chrono::{DateTime, NaiveDate, Utc};

/// Compiled form of [`Filters`]. Blank text filters compile to "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    subject: Option<String>,
    file_type: Option<FileType>,
    professor: Option<String>,
    course: Option<String>,
    semester: Option<String>,
    min_rating: Option<f64>,
    tags: Vec<String>,
    university: Option<String>,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
}

impl FilterSet {
    /// Compile request filters. Fails on a malformed date bound.
    pub fn compile(filters: &Filters) -> Result<Self> {
        Ok(Self {
            subject: needle(filters.subject.as_deref()),
            file_type: filters.file_type,
            professor: needle(filters.professor.as_deref()),
            course: needle(filters.course.as_deref()),
            semester: needle(filters.semester.as_deref()),
            min_rating: filters.min_rating.filter(|r| *r > 0.0),
            tags: filters
                .tags
                .iter()
                .filter_map(|tag| needle(Some(tag.as_str())))
                .collect(),
            university: needle(filters.university.as_deref()),
            date_from: filters
                .date_from
                .as_deref()
                .map(|value| parse_bound("dateFrom", value, Bound::Start))
                .transpose()?,
            date_to: filters
                .date_to
                .as_deref()
                .map(|value| parse_bound("dateTo", value, Bound::End))
                .transpose()?,
        })
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Every active predicate must pass.
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(subject) = &self.subject {
            if !contains_ci(&doc.subject, subject) {
                return false;
            }
        }
        if let Some(file_type) = self.file_type {
            if doc.file_type != file_type {
                return false;
            }
        }
        if !optional_contains(doc.professor.as_deref(), self.professor.as_deref())
            || !optional_contains(doc.course.as_deref(), self.course.as_deref())
            || !optional_contains(doc.semester.as_deref(), self.semester.as_deref())
        {
            return false;
        }
        if let Some(min_rating) = self.min_rating {
            if doc.rating_or_zero() < min_rating {
                return false;
            }
        }
        if !self.tags.is_empty() {
            let any_tag = doc
                .tags
                .iter()
                .any(|tag| self.tags.iter().any(|wanted| contains_ci(tag, wanted)));
            if !any_tag {
                return false;
            }
        }
        if !optional_contains(doc.uploader.institution.as_deref(), self.university.as_deref()) {
            return false;
        }
        if let Some(from) = self.date_from {
            if doc.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if doc.created_at > to {
                return false;
            }
        }
        true
    }

    /// Keep the entries whose document passes, in their existing order.
    pub fn apply<'a>(&self, working: Vec<MatchResult<'a>>) -> Vec<MatchResult<'a>> {
        if self.is_empty() {
            return working;
        }
        working
            .into_iter()
            .filter(|entry| self.matches(entry.document))
            .collect()
    }
}

/// Filter documents directly, preserving order.
pub fn filter_documents<'a>(documents: &'a [Document], filters: &Filters) -> Result<Vec<&'a Document>> {
    let set = FilterSet::compile(filters)?;
    Ok(documents.iter().filter(|doc| set.matches(doc)).collect())
}

fn needle(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// `needle` must already be lower-cased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// A present filter fails documents that lack the field.
fn optional_contains(field: Option<&str>, filter: Option<&str>) -> bool {
    match (filter, field) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(wanted), Some(value)) => contains_ci(value, wanted),
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// RFC 3339, or a bare `YYYY-MM-DD` covering the whole UTC day.
fn parse_bound(field: &'static str, value: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    let invalid = || NotedexError::InvalidDate {
        field,
        value: value.to_string(),
    };
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
    let naive = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    naive.map(|dt| dt.and_utc()).ok_or_else(invalid)
}
