//! Text Highlighter: wraps skill occurrences in emphasis markers.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Markers used by the highlighter. Defaults to HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub open: String,
    pub close: String,
    pub line_break: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
            line_break: "<br>".to_string(),
        }
    }
}

/// Wraps every case-insensitive occurrence of each skill, keeping the
/// original casing of the matched text, then converts `\n` to line breaks.
///
/// Skills are applied one after another in caller order, so a later term can
/// match inside an earlier wrapped region (or inside the markers themselves).
pub fn highlight(text: &str, skills: &[String], style: &HighlightStyle) -> String {
    if text.is_empty() {
        return String::new();
    }

    let replacement = format!(
        "{}${{0}}{}",
        escape_dollars(&style.open),
        escape_dollars(&style.close)
    );
    let mut highlighted = text.to_string();
    for skill in skills.iter().filter(|s| !s.is_empty()) {
        let re = match RegexBuilder::new(&regex::escape(skill))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                // Only reachable if an escaped literal blows the size limit.
                warn!("Skipping highlight for '{skill}': {e}");
                continue;
            }
        };
        highlighted = re
            .replace_all(&highlighted, replacement.as_str())
            .into_owned();
    }

    highlighted.replace('\n', &style.line_break)
}

fn escape_dollars(marker: &str) -> String {
    marker.replace('$', "$$")
}
