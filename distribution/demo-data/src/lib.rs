//! Shared demo catalogue for tests, benchmarks, and synthetic data generation.
//!
//! Rows live in `notes.csv` next to this crate's manifest and are embedded at
//! compile time. Multi-valued tags are `;`-separated; empty cells mean unset.

use once_cell::sync::Lazy;

pub struct DemoNote {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub course: Option<String>,
    pub professor: Option<String>,
    pub semester: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub downloads: u64,
    pub views: u64,
    /// Lower-case file type token, e.g. "pdf".
    pub file_type: String,
    pub file_size: Option<u64>,
    /// Age in days relative to "now".
    pub age_days: i64,
    pub institution: Option<String>,
}

const NOTES_CSV: &str = include_str!("../notes.csv");

pub static DEMO_NOTES: Lazy<Vec<DemoNote>> = Lazy::new(|| {
    parse_notes(NOTES_CSV).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to parse demo notes CSV: {}", e);
        Vec::new()
    })
});

fn parse_notes(csv_text: &str) -> Result<Vec<DemoNote>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut notes = Vec::new();

    for result in reader.records() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or_default();
        let optional = |idx: usize| Some(cell(idx)).filter(|v| !v.is_empty()).map(str::to_string);

        notes.push(DemoNote {
            id: cell(0).to_string(),
            title: cell(1).to_string(),
            description: optional(2),
            subject: cell(3).to_string(),
            course: optional(4),
            professor: optional(5),
            semester: optional(6),
            tags: cell(7)
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            rating: optional(8).map(|r| r.parse()).transpose()?,
            downloads: cell(9).parse()?,
            views: cell(10).parse()?,
            file_type: cell(11).to_string(),
            file_size: optional(12).map(|s| s.parse()).transpose()?,
            age_days: cell(13).parse()?,
            institution: optional(14),
        });
    }

    Ok(notes)
}
