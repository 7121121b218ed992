use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::state::AppState;

/// POST /resumes
pub async fn handle_add_resume(
    State(state): State<AppState>,
    Json(request): Json<NewResume>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    if request.file_path.trim().is_empty() {
        return Err(AppError::Validation("file_path cannot be empty".to_string()));
    }

    let resume = state.store.create_resume(request).await?;
    info!(
        "Recorded resume {} ({}) for user {}",
        resume.id, resume.original_filename, resume.user_id
    );
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /resumes/:user_id
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.store.resumes_for_user(user_id).await?))
}
