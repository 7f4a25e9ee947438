//! Match Ranker: scores, sorts, truncates and categorises candidates.

use serde::{Deserialize, Serialize};

use crate::matching::catalog::SkillCatalog;
use crate::matching::skills::extract_skills;
use crate::matching::tfidf::{score_all, VectorizerConfig};
use crate::matching::{CandidateDocument, MatchError};

/// Qualitative band for a percent score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Strong,
    Medium,
    Low,
}

/// Inclusive lower bounds (in percent) of the Strong and Medium bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryThresholds {
    pub strong: f64,
    pub medium: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            strong: 80.0,
            medium: 50.0,
        }
    }
}

impl CategoryThresholds {
    pub fn categorize(&self, percent: f64) -> Category {
        if percent >= self.strong {
            Category::Strong
        } else if percent >= self.medium {
            Category::Medium
        } else {
            Category::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: i64,
    pub filename: String,
    pub score: f64,
    pub percent: f64,
    pub skills: Vec<String>,
    pub category: Category,
}

/// `round(score * 100, 2)`.
pub fn to_percent(score: f64) -> f64 {
    (score * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Ranks `candidates` against `job_text` and keeps the best `top_k`.
///
/// Ties keep input order. Categories are assigned after truncation.
/// `top_k == 0` is rejected.
pub fn rank(
    job_text: &str,
    candidates: &[CandidateDocument],
    top_k: usize,
    catalog: &SkillCatalog,
    vectorizer: &VectorizerConfig,
    thresholds: &CategoryThresholds,
) -> Result<Vec<MatchResult>, MatchError> {
    if top_k == 0 {
        return Err(MatchError::InvalidArgument(
            "top_k must be a positive integer".to_string(),
        ));
    }
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
    let scores = score_all(job_text, &texts, vectorizer);

    let mut scored: Vec<(&CandidateDocument, f64)> =
        candidates.iter().zip(scores).collect();
    // Vec::sort_by is stable, so equal scores keep input order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(candidate, score)| {
            let percent = to_percent(score);
            MatchResult {
                id: candidate.id,
                filename: candidate.filename.clone(),
                score,
                percent,
                skills: extract_skills(catalog, &candidate.text),
                category: thresholds.categorize(percent),
            }
        })
        .collect())
}
