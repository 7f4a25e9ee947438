//! Résumé metadata and extracted text. PostgreSQL in deployment, an in-process
//! map when no `DATABASE_URL` is configured.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

/// Fields supplied on insert; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub filename: String,
    pub filepath: String,
    pub text: String,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, resume: NewResume) -> Result<ResumeRow, AppError>;

    /// All résumés, newest first.
    async fn list(&self) -> Result<Vec<ResumeRow>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<ResumeRow>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (filename, filepath, text) VALUES ($1, $2, $3) \
             RETURNING id, filename, filepath, text, created_at",
        )
        .bind(&resume.filename)
        .bind(&resume.filepath)
        .bind(&resume.text)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT id, filename, filepath, text, created_at FROM resumes ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, id: i64) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT id, filename, filepath, text, created_at FROM resumes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resumes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Non-persistent store used for local runs and tests.
pub struct MemoryResumeStore {
    rows: RwLock<Vec<ResumeRow>>,
    next_id: AtomicI64,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryResumeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn insert(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let row = ResumeRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            filename: resume.filename,
            filepath: resume.filepath,
            text: resume.text,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<ResumeRow>, AppError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<ResumeRow>, AppError> {
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.rows.read().await.len() as i64)
    }
}
