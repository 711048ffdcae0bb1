//! Synthetic catalogue generator for benchmarks and manual testing.
//!
//! Expands the demo notes into a large JSON snapshot that the
//! `search-catalogue` binary (or any caller of `notedex::search`) can load.
//!
//! Run with: cargo run -p catalogue-gen -- --count 100000 --output catalogue.json

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use demo_data::{DemoNote, DEMO_NOTES};
use notedex::{Document, FileType, Uploader};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of documents to generate
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// RNG seed; everything except timestamps is reproducible from it
    #[arg(short, long, default_value_t = 0xC11B0A8D)]
    seed: u64,

    /// Output path for the JSON array
    #[arg(short, long, default_value = "catalogue.json")]
    output: PathBuf,
}

const SEMESTERS: &[&str] = &["Fall 2023", "Spring 2024", "Fall 2024", "Spring 2025"];

const INSTITUTIONS: &[&str] = &["State University", "Tech Institute", "City College", "Riverside College"];

const TITLE_SUFFIXES: &[&str] = &["", " (annotated)", " - week 3", " - final review", " v2", " summary"];

/// Maximum generated age, roughly two years.
const MAX_AGE_DAYS: f64 = 730.0;

/// Age in days, exponentially biased towards recent uploads.
fn generate_age_days(rng: &mut StdRng) -> i64 {
    let lambda = 4.0 / MAX_AGE_DAYS;
    let u: f64 = rng.gen_range(0.0001..1.0); // Avoid ln(0)
    (-u.ln() / lambda).min(MAX_AGE_DAYS) as i64
}

fn generate_document(
    seed: &DemoNote,
    index: usize,
    now: DateTime<Utc>,
    rng: &mut StdRng,
) -> Result<Document> {
    let suffix = TITLE_SUFFIXES.choose(rng).copied().unwrap_or_default();

    let mut doc = Document::new(
        format!("{}-{index:06}", seed.id),
        format!("{}{suffix}", seed.title),
        seed.subject.clone(),
        now - Duration::days(generate_age_days(rng)),
    );
    doc.description = seed.description.clone();
    doc.course = seed.course.clone();
    doc.professor = seed.professor.clone();
    doc.semester = SEMESTERS.choose(rng).map(|s| s.to_string());
    doc.tags = seed.tags.clone();
    // One in ten notes is unrated.
    doc.rating = if rng.gen_bool(0.1) {
        None
    } else {
        Some((rng.gen_range(1.0..=5.0_f64) * 10.0).round() / 10.0)
    };
    doc.downloads = rng.gen_range(0..2_000);
    doc.views = doc.downloads + rng.gen_range(0..10_000);
    doc.file_type = seed
        .file_type
        .parse::<FileType>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("demo note {} has a bad file type", seed.id))?;
    doc.file_size = seed
        .file_size
        .map(|size| size / 2 + rng.gen_range(0..size.max(1)));
    doc.uploader = Uploader {
        id: format!("user-{}", rng.gen_range(0..500)),
        name: format!("Student {}", index % 997),
        institution: if rng.gen_bool(0.15) {
            None
        } else {
            INSTITUTIONS.choose(rng).map(|s| s.to_string())
        },
    };
    Ok(doc)
}

fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(!DEMO_NOTES.is_empty(), "demo catalogue is empty");

    let mut rng = StdRng::seed_from_u64(args.seed);
    let now = Utc::now();
    let documents = (0..args.count)
        .map(|index| generate_document(&DEMO_NOTES[index % DEMO_NOTES.len()], index, now, &mut rng))
        .collect::<Result<Vec<_>>>()?;

    let json = serde_json::to_string(&documents)?;
    fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("Wrote {} documents to {}", documents.len(), args.output.display());
    Ok(())
}
