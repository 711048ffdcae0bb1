//! Fixtures shared by the integration tests and the benchmark.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use demo_data::{DemoNote, DEMO_NOTES};
use notedex::{Document, FileType, Uploader};

/// Fixed "now" so date-based assertions never drift.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub fn to_document(note: &DemoNote) -> Document {
    let mut doc = Document::new(
        note.id.clone(),
        note.title.clone(),
        note.subject.clone(),
        anchor() - Duration::days(note.age_days),
    );
    doc.description = note.description.clone();
    doc.course = note.course.clone();
    doc.professor = note.professor.clone();
    doc.semester = note.semester.clone();
    doc.tags = note.tags.clone();
    doc.rating = note.rating;
    doc.downloads = note.downloads;
    doc.views = note.views;
    doc.file_type = note.file_type.parse::<FileType>().unwrap();
    doc.file_size = note.file_size;
    doc.uploader = Uploader {
        id: format!("u-{}", note.id),
        name: "Demo Uploader".to_string(),
        institution: note.institution.clone(),
    };
    doc
}

/// The whole demo catalogue as engine documents, in CSV order.
pub fn demo_catalogue() -> Vec<Document> {
    DEMO_NOTES.iter().map(to_document).collect()
}

/// The two-document catalogue used by the worked scenarios.
pub fn scenario_documents() -> Vec<Document> {
    let mut calculus = Document::new("1", "Intro to Calculus", "Math", anchor());
    calculus.rating = Some(4.5);
    calculus.downloads = 10;

    let mut chemistry = Document::new("2", "Organic Chemistry Basics", "Chemistry", anchor());
    chemistry.rating = Some(3.0);
    chemistry.downloads = 50;

    vec![calculus, chemistry]
}

pub fn ids(notes: &[Document]) -> Vec<String> {
    notes.iter().map(|d| d.id.clone()).collect()
}
