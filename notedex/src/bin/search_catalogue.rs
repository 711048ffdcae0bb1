//! Search a catalogue snapshot from the command line.
//!
//! # Usage
//!
//! ```bash
//! search-catalogue notes.json --query "calc" --min-rating 4
//! search-catalogue notes.json --subject physics --sort downloads --order asc --limit 5
//! search-catalogue notes.json --query "org" --suggest 10
//! ```
//!
//! The catalogue is a JSON array of documents. Results are printed as JSON on
//! stdout; logs go to stderr (`RUST_LOG` overrides `--verbose`).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use notedex::{
    Document, FileType, Filters, NoteSearchApi, QuerySpec, SearchConfig, SearchEngine, SortKey,
    SortOrder,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "search-catalogue", version, about)]
struct Cli {
    /// Path to a JSON array of documents
    catalogue: PathBuf,

    /// Free-text query
    #[arg(short, long)]
    query: Option<String>,

    #[arg(long)]
    subject: Option<String>,

    /// pdf, doc, docx, ppt, pptx, txt, md, or image
    #[arg(long)]
    file_type: Option<FileType>,

    #[arg(long)]
    professor: Option<String>,

    #[arg(long)]
    course: Option<String>,

    #[arg(long)]
    semester: Option<String>,

    #[arg(long)]
    min_rating: Option<f64>,

    /// Repeatable; a note passes if any of its tags matches any of these
    #[arg(long = "tag")]
    tags: Vec<String>,

    #[arg(long)]
    university: Option<String>,

    /// RFC 3339 timestamp or YYYY-MM-DD (inclusive)
    #[arg(long)]
    date_from: Option<String>,

    /// RFC 3339 timestamp or YYYY-MM-DD (inclusive)
    #[arg(long)]
    date_to: Option<String>,

    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    sort: SortArg,

    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    order: OrderArg,

    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Page size (defaults to the configured page size)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print up to N suggestions for --query instead of searching
    #[arg(long, value_name = "N")]
    suggest: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    Date,
    Rating,
    Downloads,
    Views,
    Title,
    FileSize,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortKey::Relevance,
            SortArg::Date => SortKey::Date,
            SortArg::Rating => SortKey::Rating,
            SortArg::Downloads => SortKey::Downloads,
            SortArg::Views => SortKey::Views,
            SortArg::Title => SortKey::Title,
            SortArg::FileSize => SortKey::FileSize,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

impl Cli {
    fn query_spec(&self) -> QuerySpec {
        QuerySpec {
            search: self.query.clone(),
            filters: Filters {
                subject: self.subject.clone(),
                file_type: self.file_type,
                professor: self.professor.clone(),
                course: self.course.clone(),
                semester: self.semester.clone(),
                min_rating: self.min_rating,
                tags: self.tags.clone(),
                university: self.university.clone(),
                date_from: self.date_from.clone(),
                date_to: self.date_to.clone(),
            },
            sort_by: self.sort.into(),
            sort_order: self.order.into(),
            page: self.page,
            limit: self.limit,
        }
    }
}

fn load_catalogue(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalogue {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    let engine = SearchEngine::new(config)?;
    let documents = load_catalogue(&cli.catalogue)?;
    tracing::info!(documents = documents.len(), "catalogue loaded");

    let output = match cli.suggest {
        Some(limit) => {
            let query = cli.query.as_deref().unwrap_or_default();
            serde_json::to_string_pretty(&engine.suggest(query, &documents, limit))?
        }
        None => {
            let page = engine.search(&documents, &cli.query_spec())?;
            serde_json::to_string_pretty(&page)?
        }
    };
    println!("{}", output);

    Ok(())
}
