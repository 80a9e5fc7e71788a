pub mod health;
pub mod jobs;
pub mod recommendations;
pub mod resumes;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation API
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_recommendations),
        )
        .route(
            "/api/v1/recommendations/explain",
            post(recommendations::handle_explain),
        )
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume).get(resumes::handle_list_resumes),
        )
        // Job API
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .with_state(state)
}
