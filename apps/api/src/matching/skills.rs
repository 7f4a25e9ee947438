//! Skill Extractor: plain substring membership against the catalog.
//!
//! No word boundaries: `"c"` matches inside `"docker"`. That is the intended
//! behaviour and is relied on by the coverage counts.

use crate::matching::catalog::SkillCatalog;

/// Returns the catalog skills present in `text`, in catalog order.
pub fn extract_skills(catalog: &SkillCatalog, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    catalog
        .iter()
        .filter(|skill| lowered.contains(skill))
        .map(str::to_string)
        .collect()
}

/// Counts, for every catalog skill, how many texts mention it.
///
/// Each text counts at most once per skill. Output follows catalog order.
pub fn count_skill_coverage<'a, I>(catalog: &SkillCatalog, texts: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = texts.into_iter().map(str::to_lowercase).collect();
    catalog
        .iter()
        .map(|skill| {
            let count = lowered.iter().filter(|t| t.contains(skill)).count();
            (skill.to_string(), count)
        })
        .collect()
}
