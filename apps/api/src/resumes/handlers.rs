use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::skills::count_skill_coverage;
use crate::matching::stats::SkillCounts;
use crate::matching::SkillCatalog;
use crate::models::resume::{ResumeRow, ResumeSummary};
use crate::resumes::extract::{allowed_extension, extract_text, secure_filename};
use crate::resumes::store::NewResume;
use crate::state::AppState;

/// Multipart field carrying the upload.
const UPLOAD_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub skill: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Computed over every résumé, before the skill filter.
    pub skill_counts: SkillCounts,
    pub skills: SkillCatalog,
    pub selected_skill: String,
    pub resumes: Vec<ResumeSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub job: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub resume: ResumeRow,
    pub highlighted: String,
    pub matched_skills: Vec<String>,
}

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((original, bytes));
        break;
    }

    let (original, bytes) = upload
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Please select a resume file (PDF, DOCX or TXT)".to_string())
        })?;

    let filename = secure_filename(&original)?;
    let kind = allowed_extension(&filename)?;
    let key = format!("uploads/{}_{}", Uuid::new_v4().simple(), filename);

    let text = extract_text(kind, bytes.clone()).await;
    state
        .blobs
        .put(&key, bytes, kind.content_type())
        .await?;

    let inserted = state
        .store
        .insert(NewResume {
            filename: filename.clone(),
            filepath: key.clone(),
            text,
        })
        .await;
    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            // The object is unreferenced once the insert fails.
            if let Err(cleanup) = state.blobs.delete(&key).await {
                warn!("Orphaned upload {key} left in blob storage: {cleanup}");
            }
            return Err(e);
        }
    };
    info!("Stored resume {} ({}, {} chars)", row.id, row.filename, row.text.len());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: row.id,
            skills: state.matcher.extract_skills(&row.text),
            filename,
        }),
    ))
}

/// GET /api/v1/resumes?skill=
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let rows = state.store.list().await?;
    let catalog = state.matcher.catalog();
    let skill_counts = SkillCounts(count_skill_coverage(
        catalog,
        rows.iter().map(|r| r.text.as_str()),
    ));

    let selected_skill = params
        .skill
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let resumes = rows
        .iter()
        .filter(|r| selected_skill.is_empty() || r.text.to_lowercase().contains(&selected_skill))
        .map(ResumeSummary::from)
        .collect();

    Ok(Json(DashboardResponse {
        skill_counts,
        skills: catalog.clone(),
        selected_skill,
        resumes,
    }))
}

/// GET /api/v1/resumes/:id?job=
pub async fn handle_view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, AppError> {
    let resume = find_resume(&state, id).await?;

    let job = params.job.unwrap_or_default();
    let job = job.trim();
    let (highlighted, matched_skills) = if job.is_empty() {
        (resume.text.clone(), Vec::new())
    } else {
        let skills = state.matcher.extract_skills(job);
        (state.matcher.highlight(&resume.text, &skills), skills)
    };

    Ok(Json(ViewResponse {
        resume,
        highlighted,
        matched_skills,
    }))
}

/// GET /api/v1/resumes/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let resume = find_resume(&state, id).await?;
    let bytes = state
        .blobs
        .get(&resume.filepath)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File for resume {id} not found")))?;

    let content_type = allowed_extension(&resume.filepath)
        .map(|kind| kind.content_type())
        .unwrap_or("application/octet-stream");
    let disposition = format!(
        "attachment; filename=\"{}\"",
        resume.filename.replace(['"', '\\'], "_")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn find_resume(state: &AppState, id: i64) -> Result<ResumeRow, AppError> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}
