//! Axum route handlers for the Screening API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screening::{RankedScreeningResult, ScreeningResultRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub job_id: Uuid,
}

/// POST /screening/run
///
/// Scores every candidate's latest resume against the job and replaces the
/// job's previous results. 404 for an unknown job, 409 when no resumes exist.
pub async fn handle_run_screening(
    State(state): State<AppState>,
    Json(request): Json<ScreeningRequest>,
) -> Result<Json<Vec<ScreeningResultRow>>, AppError> {
    let rows = state.screening.run(request.job_id).await?;
    Ok(Json(rows))
}

/// GET /screening/results/:job_id
///
/// Results joined with resume metadata, highest score first.
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedScreeningResult>>, AppError> {
    Ok(Json(state.store.ranked_results(job_id).await?))
}
