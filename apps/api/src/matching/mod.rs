// Matching core: skill catalog, extraction, highlighting, TF-IDF similarity,
// ranking and corpus statistics. Pure and synchronous. Handlers run it inside
// tokio::task::spawn_blocking.

pub mod catalog;
pub mod handlers;
pub mod highlight;
pub mod ranking;
pub mod skills;
pub mod stats;
pub mod stop_words;
pub mod tfidf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::SkillCatalog;
pub use highlight::HighlightStyle;
pub use ranking::{CategoryThresholds, MatchResult};
pub use stats::CorpusStats;
pub use tfidf::{StopWords, VectorizerConfig};

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A stored document as seen by the matcher: already-extracted text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: i64,
    pub filename: String,
    pub text: String,
}

impl CandidateDocument {
    pub fn new(id: i64, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// Tunables injected into the `Matcher` at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub catalog: SkillCatalog,
    pub vectorizer: VectorizerConfig,
    pub thresholds: CategoryThresholds,
    pub default_top_k: usize,
    pub highlight: HighlightStyle,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            catalog: SkillCatalog::default(),
            vectorizer: VectorizerConfig::default(),
            thresholds: CategoryThresholds::default(),
            default_top_k: DEFAULT_TOP_K,
            highlight: HighlightStyle::default(),
        }
    }
}

/// Entry point for the matching core. Immutable and cheap to share via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.config.catalog
    }

    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        skills::extract_skills(&self.config.catalog, text)
    }

    pub fn highlight(&self, text: &str, skills: &[String]) -> String {
        highlight::highlight(text, skills, &self.config.highlight)
    }

    /// Top-K ranking. `None` uses the configured default.
    pub fn rank(
        &self,
        job_text: &str,
        candidates: &[CandidateDocument],
        top_k: Option<usize>,
    ) -> Result<Vec<MatchResult>, MatchError> {
        ranking::rank(
            job_text,
            candidates,
            top_k.unwrap_or(self.config.default_top_k),
            &self.config.catalog,
            &self.config.vectorizer,
            &self.config.thresholds,
        )
    }

    pub fn stats(&self, job_text: &str, candidates: &[CandidateDocument]) -> CorpusStats {
        stats::corpus_stats(
            job_text,
            candidates,
            &self.config.catalog,
            &self.config.vectorizer,
            &self.config.thresholds,
        )
    }
}
