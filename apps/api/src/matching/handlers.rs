use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::{CandidateDocument, CorpusStats, MatchResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job_text: String,
    /// Falls back to `MATCH_TOP_K`.
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub results: Vec<MatchResult>,
    pub stats: CorpusStats,
}

/// POST /api/v1/match
///
/// Ranking and corpus statistics vectorize independently and run side by side
/// on the blocking pool.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(req) = payload?;
    let job_text = req.job_text.trim().to_string();
    if job_text.is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description".to_string(),
        ));
    }

    let mut rows = state.store.list().await?;
    rows.sort_by_key(|r| r.id);
    let candidates: Arc<Vec<CandidateDocument>> =
        Arc::new(rows.iter().map(|r| r.to_candidate()).collect());
    let job_text = Arc::new(job_text);

    let rank_task = {
        let (matcher, candidates, job_text) =
            (state.matcher.clone(), candidates.clone(), job_text.clone());
        tokio::task::spawn_blocking(move || matcher.rank(&job_text, &candidates, req.top_k))
    };
    let stats_task = {
        let (matcher, candidates, job_text) =
            (state.matcher.clone(), candidates.clone(), job_text.clone());
        tokio::task::spawn_blocking(move || matcher.stats(&job_text, &candidates))
    };

    let (ranked, stats) = tokio::join!(rank_task, stats_task);
    let results = ranked.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in ranking: {e}"))
    })??;
    let stats = stats.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in corpus stats: {e}"))
    })?;

    info!(
        "Matched job description against {} resumes, returning {}",
        candidates.len(),
        results.len()
    );

    Ok(Json(MatchResponse { results, stats }))
}
