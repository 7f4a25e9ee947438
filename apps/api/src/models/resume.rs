use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::matching::CandidateDocument;

/// One stored résumé. `filepath` is the blob-store key of the original upload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub filename: String,
    pub filepath: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn to_candidate(&self) -> CandidateDocument {
        CandidateDocument::new(self.id, self.filename.clone(), self.text.clone())
    }
}

/// Listing entry for the dashboard; omits the full text.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub id: i64,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ResumeRow> for ResumeSummary {
    fn from(row: &ResumeRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename.clone(),
            created_at: row.created_at,
        }
    }
}
