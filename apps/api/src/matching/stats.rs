//! Corpus Statistics: category distribution and skill coverage over every
//! candidate, unsorted and untruncated.
//!
//! This vectorizes independently of `rank`, so percents here can drift
//! slightly from the ranked list for the same request.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::matching::catalog::SkillCatalog;
use crate::matching::ranking::{to_percent, Category, CategoryThresholds};
use crate::matching::skills::count_skill_coverage;
use crate::matching::tfidf::{score_all, VectorizerConfig};
use crate::matching::CandidateDocument;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    #[serde(rename = "Strong")]
    pub strong: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Low")]
    pub low: usize,
}

impl CategoryCounts {
    fn record(&mut self, category: Category) {
        match category {
            Category::Strong => self.strong += 1,
            Category::Medium => self.medium += 1,
            Category::Low => self.low += 1,
        }
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.strong + self.medium + self.low
    }
}

/// Skill → candidate count, serialized as a JSON object in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCounts(pub Vec<(String, usize)>);

impl SkillCounts {
    #[cfg(test)]
    pub fn get(&self, skill: &str) -> Option<usize> {
        self.0.iter().find(|(s, _)| s == skill).map(|(_, c)| *c)
    }
}

impl Serialize for SkillCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (skill, count) in &self.0 {
            map.serialize_entry(skill, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub categories: CategoryCounts,
    pub percents: Vec<f64>,
    pub skill_counts: SkillCounts,
}

pub fn corpus_stats(
    job_text: &str,
    candidates: &[CandidateDocument],
    catalog: &SkillCatalog,
    vectorizer: &VectorizerConfig,
    thresholds: &CategoryThresholds,
) -> CorpusStats {
    let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();

    let mut categories = CategoryCounts::default();
    let percents: Vec<f64> = score_all(job_text, &texts, vectorizer)
        .into_iter()
        .map(|score| {
            let percent = to_percent(score);
            categories.record(thresholds.categorize(percent));
            percent
        })
        .collect();

    CorpusStats {
        categories,
        percents,
        skill_counts: SkillCounts(count_skill_coverage(catalog, texts.iter().copied())),
    }
}
