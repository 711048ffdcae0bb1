//! Core data models for Notedex
//!
//! Documents are owned by the external store. The engine only borrows a
//! snapshot of them per search call and never mutates a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// FILE TYPES
// ─────────────────────────────────────────────────────────────────────────────

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Pdf,
    Doc,
    Docx,
    Ppt,
    Pptx,
    Txt,
    Md,
    Image,
}

/// MIME type -> file type. Several image MIME types collapse onto `Image`.
const MIME_TABLE: &[(&str, FileType)] = &[
    ("application/pdf", FileType::Pdf),
    ("application/msword", FileType::Doc),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        FileType::Docx,
    ),
    ("application/vnd.ms-powerpoint", FileType::Ppt),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        FileType::Pptx,
    ),
    ("text/plain", FileType::Txt),
    ("text/markdown", FileType::Md),
    ("image/png", FileType::Image),
    ("image/jpeg", FileType::Image),
    ("image/gif", FileType::Image),
    ("image/webp", FileType::Image),
];

impl FileType {
    pub const ALL: [FileType; 8] = [
        FileType::Pdf,
        FileType::Doc,
        FileType::Docx,
        FileType::Ppt,
        FileType::Pptx,
        FileType::Txt,
        FileType::Md,
        FileType::Image,
    ];

    /// Resolve an upload's MIME type. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<FileType> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        MIME_TABLE
            .iter()
            .find(|(m, _)| *m == essence)
            .map(|(_, file_type)| *file_type)
    }

    /// Canonical MIME type (the first table entry for this file type).
    pub fn mime_type(self) -> &'static str {
        MIME_TABLE
            .iter()
            .find(|(_, file_type)| *file_type == self)
            .map(|(m, _)| *m)
            .unwrap_or("application/octet-stream")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Doc => "doc",
            FileType::Docx => "docx",
            FileType::Ppt => "ppt",
            FileType::Pptx => "pptx",
            FileType::Txt => "txt",
            FileType::Md => "md",
            FileType::Image => "image",
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|file_type| file_type.as_str() == lower)
            .ok_or_else(|| format!("unknown file type: {s}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DOCUMENT
// ─────────────────────────────────────────────────────────────────────────────

/// Uploader metadata attached to a note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploader {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: Option<String>,
}

/// A user-submitted note as supplied by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub professor: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default)]
    pub file_size: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub uploader: Uploader,
}

impl Document {
    /// Create a document with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        subject: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            subject: subject.into(),
            course: None,
            professor: None,
            semester: None,
            tags: Vec::new(),
            rating: None,
            downloads: 0,
            views: 0,
            file_type: FileType::default(),
            file_size: None,
            created_at,
            uploader: Uploader::default(),
        }
    }

    /// Rating used for comparisons: unset, non-finite, or signed zero counts as
    /// positive 0, so every "no rating" spelling ties under a total order.
    pub fn rating_or_zero(&self) -> f64 {
        match self.rating {
            Some(r) if r.is_finite() && r != 0.0 => r,
            _ => 0.0,
        }
    }

    pub fn file_size_or_zero(&self) -> u64 {
        self.file_size.unwrap_or(0)
    }

    /// The searchable text fields, in fixed order: title, description,
    /// subject, course, professor. Tags are exposed separately.
    pub fn text_fields(&self) -> [Option<&str>; 5] {
        [
            Some(self.title.as_str()),
            self.description.as_deref(),
            Some(self.subject.as_str()),
            self.course.as_deref(),
            self.professor.as_deref(),
        ]
    }
}

/// Ratings arrive as numbers, numeric strings, or null. Anything that does not
/// parse to a finite number is treated as unset rather than failing the snapshot.
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Number(f64),
        Text(String),
    }

    let raw = Option::<RawRating>::deserialize(deserializer)?;
    let value = match raw {
        Some(RawRating::Number(n)) => Some(n),
        Some(RawRating::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(value.filter(|r| r.is_finite()))
}
