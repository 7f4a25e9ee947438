//! Similarity Engine: joint TF-IDF vectorization and cosine scoring.
//!
//! Every call builds its own vocabulary and IDF table from the documents it is
//! given. Nothing is cached between calls, so scores are only comparable
//! within one call.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::matching::stop_words::ENGLISH_STOP_WORDS;

/// Runs of two or more word characters.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Which stop words are removed before counting.
#[derive(Debug, Clone, PartialEq)]
pub enum StopWords {
    English,
    None,
    Custom(HashSet<String>),
}

impl StopWords {
    /// Parses a setting value: `english`, `none` (or empty), or a
    /// comma-separated custom list.
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("english") {
            StopWords::English
        } else if value.is_empty() || value.eq_ignore_ascii_case("none") {
            StopWords::None
        } else {
            StopWords::Custom(
                value
                    .split(',')
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect(),
            )
        }
    }

    fn contains(&self, term: &str) -> bool {
        match self {
            StopWords::English => ENGLISH_STOP_WORDS.contains(term),
            StopWords::None => false,
            StopWords::Custom(words) => words.contains(term),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    pub stop_words: StopWords,
    /// `None` keeps the whole vocabulary.
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::English,
            max_features: Some(DEFAULT_MAX_FEATURES),
        }
    }
}

/// Sparse row: `(term index, weight)` sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

/// Output of one joint vectorization.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<SparseVector>,
}

/// Lowercases, tokenizes and drops stop words.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !stop_words.contains(t))
        .map(str::to_string)
        .collect()
}

/// Fits a vocabulary and IDF table over `docs` and returns one L2-normalised
/// row per document.
///
/// idf(t) = ln((1 + n) / (1 + df(t))) + 1, weight = raw count × idf.
/// Degenerate input (no tokens at all) yields an empty vocabulary and empty
/// rows rather than an error.
pub fn fit_transform(docs: &[&str], config: &VectorizerConfig) -> TfidfMatrix {
    let counts: Vec<HashMap<String, usize>> = docs
        .iter()
        .map(|doc| {
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in tokenize(doc, &config.stop_words) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    let mut df: HashMap<&str, usize> = HashMap::new();
    for tf in &counts {
        for (term, &count) in tf {
            *totals.entry(term.as_str()).or_insert(0) += count;
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<&str> = totals.keys().copied().collect();
    if let Some(cap) = config.max_features {
        if terms.len() > cap {
            terms.sort_by(|a, b| totals[b].cmp(&totals[a]).then_with(|| a.cmp(b)));
            terms.truncate(cap);
        }
    }
    terms.sort_unstable();

    let index: HashMap<&str, usize> = terms.iter().enumerate().map(|(i, t)| (*t, i)).collect();
    let n_docs = docs.len() as f64;
    let idf: Vec<f64> = terms
        .iter()
        .map(|t| ((1.0 + n_docs) / (1.0 + df[t] as f64)).ln() + 1.0)
        .collect();

    let rows = counts
        .iter()
        .map(|tf| {
            let mut row: SparseVector = tf
                .iter()
                .filter_map(|(term, &count)| {
                    index
                        .get(term.as_str())
                        .map(|&i| (i, count as f64 * idf[i]))
                })
                .collect();
            row.sort_unstable_by_key(|&(i, _)| i);
            let norm = l2_norm(&row);
            if norm > 0.0 {
                for (_, w) in row.iter_mut() {
                    *w /= norm;
                }
            }
            row
        })
        .collect();

    let matrix = TfidfMatrix {
        vocabulary: terms.into_iter().map(str::to_string).collect(),
        rows,
    };
    debug!(
        "Vectorized {} documents over {} terms",
        matrix.rows.len(),
        matrix.vocabulary.len()
    );
    matrix
}

fn l2_norm(v: &[(usize, f64)]) -> f64 {
    v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
}

/// Cosine similarity of two sparse rows; 0 when either has zero norm.
pub fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (norm_a, norm_b) = (l2_norm(a), l2_norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot / (norm_a * norm_b)
}

/// Scores each candidate against the query, in candidate order.
///
/// Query and candidates are vectorized together in one shared space.
/// An empty candidate list returns immediately without vectorizing.
pub fn score_all(query: &str, candidates: &[&str], config: &VectorizerConfig) -> Vec<f64> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut docs = Vec::with_capacity(candidates.len() + 1);
    docs.push(query);
    docs.extend_from_slice(candidates);

    let matrix = fit_transform(&docs, config);
    let (query_row, candidate_rows) = matrix.rows.split_at(1);
    candidate_rows
        .iter()
        .map(|row| cosine(&query_row[0], row).clamp(0.0, 1.0))
        .collect()
}
