use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};
use crate::state::AppState;

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<NewJob>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let job = state.store.create_job(request).await?;
    info!("Created job {} for admin {}", job.id, job.admin_id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /jobs/:admin_id
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Path(admin_id): Path<Uuid>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(state.store.jobs_for_admin(admin_id).await?))
}
