use std::sync::Arc;

use crate::config::Config;
use crate::matching::Matcher;
use crate::resumes::blobs::BlobStore;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Résumé rows. PostgreSQL or in-memory, chosen from `DATABASE_URL`.
    pub store: Arc<dyn ResumeStore>,
    /// Original upload bytes. S3 or in-memory, chosen from `S3_BUCKET`.
    pub blobs: Arc<dyn BlobStore>,
    pub matcher: Arc<Matcher>,
    pub config: Config,
}
