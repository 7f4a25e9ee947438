use anyhow::{bail, Context, Result};

use crate::matching::tfidf::DEFAULT_MAX_FEATURES;
use crate::matching::{
    CategoryThresholds, MatcherConfig, SkillCatalog, StopWords, VectorizerConfig, DEFAULT_TOP_K,
};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Object storage settings. Present only when `S3_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Custom endpoint (MinIO); `None` uses the AWS default.
    pub endpoint: Option<String>,
    pub region: String,
    /// Static credentials; `None` falls back to the default provider chain.
    pub credentials: Option<(String, String)>,
}

/// Application configuration loaded from environment variables.
/// Fails at startup on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` keeps résumés in memory.
    pub database_url: Option<String>,
    /// `None` keeps uploads in memory.
    pub s3: Option<S3Config>,
    pub port: u16,
    pub rust_log: String,
    pub seed_sample_resumes: bool,
    pub max_upload_bytes: usize,
    pub matcher: MatcherConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let s3 = var("S3_BUCKET").map(|bucket| S3Config {
            bucket,
            endpoint: var("S3_ENDPOINT"),
            region: var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            credentials: var("AWS_ACCESS_KEY_ID").zip(var("AWS_SECRET_ACCESS_KEY")),
        });

        let catalog = match var("SKILL_CATALOG") {
            Some(list) => {
                let catalog = SkillCatalog::new(list.split(','));
                if catalog.is_empty() {
                    bail!("SKILL_CATALOG must list at least one skill");
                }
                catalog
            }
            None => SkillCatalog::default(),
        };

        let default_top_k = parse_or(var("MATCH_TOP_K"), "MATCH_TOP_K", DEFAULT_TOP_K)?;
        if default_top_k == 0 {
            bail!("MATCH_TOP_K must be at least 1");
        }

        let max_features = match var("TFIDF_MAX_FEATURES") {
            None => Some(DEFAULT_MAX_FEATURES),
            Some(v) if v.eq_ignore_ascii_case("none") => None,
            Some(v) => match v
                .parse::<usize>()
                .context("TFIDF_MAX_FEATURES must be a non-negative integer or 'none'")?
            {
                0 => None,
                n => Some(n),
            },
        };

        let stop_words = var("TFIDF_STOP_WORDS")
            .map(|v| StopWords::from_setting(&v))
            .unwrap_or(StopWords::English);

        let thresholds = CategoryThresholds {
            strong: parse_or(var("STRONG_THRESHOLD"), "STRONG_THRESHOLD", 80.0)?,
            medium: parse_or(var("MEDIUM_THRESHOLD"), "MEDIUM_THRESHOLD", 50.0)?,
        };
        if !(0.0..=100.0).contains(&thresholds.medium)
            || !(0.0..=100.0).contains(&thresholds.strong)
            || thresholds.medium > thresholds.strong
        {
            bail!(
                "Thresholds must satisfy 0 <= MEDIUM_THRESHOLD ({}) <= STRONG_THRESHOLD ({}) <= 100",
                thresholds.medium,
                thresholds.strong
            );
        }

        Ok(Config {
            database_url: var("DATABASE_URL"),
            s3,
            port: parse_or(var("PORT"), "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            seed_sample_resumes: parse_bool(var("SEED_SAMPLE_RESUMES"), "SEED_SAMPLE_RESUMES")?,
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            matcher: MatcherConfig {
                catalog,
                vectorizer: VectorizerConfig {
                    stop_words,
                    max_features,
                },
                thresholds,
                default_top_k,
                ..MatcherConfig::default()
            },
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{v}'")),
        None => Ok(default),
    }
}

/// Unset means true.
fn parse_bool(value: Option<String>, key: &str) -> Result<bool> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => bail!("Environment variable '{key}' has invalid boolean '{other}'"),
    }
}
