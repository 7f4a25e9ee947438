//! Skill Catalog: the ordered universe of recognised skill keywords.
//!
//! Injected into the `Matcher` at construction; never process-wide state.

use serde::{Deserialize, Serialize};

/// Built-in catalog used when `SKILL_CATALOG` is not configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "django",
    "flask",
    "java",
    "c++",
    "c",
    "javascript",
    "react",
    "angular",
    "html",
    "css",
    "mysql",
    "mongodb",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "linux",
    "machine learning",
    "data science",
    "tensorflow",
    "pytorch",
    "nlp",
    "php",
    ".net",
];

/// Ordered set of lowercase skill strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillCatalog {
    skills: Vec<String>,
}

impl SkillCatalog {
    /// Builds a catalog from arbitrary strings.
    ///
    /// Entries are trimmed and lowercased; blanks are dropped and the first
    /// occurrence of a duplicate wins, so catalog order is input order.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for skill in skills {
            let skill = skill.as_ref().trim().to_lowercase();
            if skill.is_empty() || out.contains(&skill) {
                continue;
            }
            out.push(skill);
        }
        Self { skills: out }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.skills.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}
