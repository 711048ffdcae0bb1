//! Engine configuration.
//!
//! Passed in at construction and never mutated afterwards. Partial JSON files
//! are accepted: missing keys take their defaults.

use crate::interface::{NotedexError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-field weights for the fuzzy matcher. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub description: f64,
    pub subject: f64,
    pub course: f64,
    pub professor: f64,
    pub tags: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.30,
            description: 0.20,
            subject: 0.20,
            course: 0.15,
            professor: 0.10,
            tags: 0.05,
        }
    }
}

impl FieldWeights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.title,
            self.description,
            self.subject,
            self.course,
            self.professor,
            self.tags,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Fuzzy matcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub weights: FieldWeights,
    /// Allowed score for a field match (errors / pattern length plus proximity
    /// penalty). 0.0 requires a perfect match at the start of the field.
    pub threshold: f64,
    /// How many characters away from the field start a match can sit before
    /// proximity alone exhausts the threshold. 0 means matches must start at 0.
    pub distance: usize,
    /// Patterns shorter than this never match.
    pub min_match_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            threshold: 0.4,
            distance: 100,
            min_match_len: 2,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(NotedexError::InvalidConfig(
                "field weights must be finite and non-negative".to_string(),
            ));
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(NotedexError::InvalidConfig(format!(
                "field weights must sum to 1.0, got {sum}"
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(NotedexError::InvalidConfig(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.min_match_len == 0 {
            return Err(NotedexError::InvalidConfig(
                "min_match_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub matcher: MatcherConfig,
    /// Page size used when a query carries no limit.
    pub default_page_size: usize,
    /// Optional operator cap on `limit`. Unset by default, so a caller's page
    /// size is always honored as given.
    pub max_page_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            default_page_size: 20,
            max_page_size: None,
        }
    }
}

impl SearchConfig {
    /// Loads config from a JSON file. Returns default config if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()?;
        if self.default_page_size == 0 || self.max_page_size == Some(0) {
            return Err(NotedexError::InvalidConfig(
                "page sizes must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_page_size {
            if self.default_page_size > max {
                return Err(NotedexError::InvalidConfig(format!(
                    "default_page_size {} exceeds max_page_size {max}",
                    self.default_page_size
                )));
            }
        }
        Ok(())
    }
}
