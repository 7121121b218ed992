pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/jobs", post(jobs::handle_create_job))
        .route("/jobs/:admin_id", get(jobs::handle_list_jobs))
        // Resumes
        .route("/resumes", post(resumes::handle_add_resume))
        .route("/resumes/:user_id", get(resumes::handle_list_resumes))
        // Screening
        .route("/screening/run", post(screening::handle_run_screening))
        .route(
            "/screening/results/:job_id",
            get(screening::handle_get_results),
        )
        .with_state(state)
}
