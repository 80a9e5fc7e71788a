use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai_client::JobEmbeddingRequest;
use crate::errors::AppError;
use crate::models::job::{JobRow, WorkMode};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub role: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub job_type: Option<String>,
    pub duration_months: Option<i32>,
    pub stipend_amount: Option<f64>,
    pub stipend_currency: Option<String>,
    pub stipend_type: Option<String>,
}

/// POST /api/v1/jobs
///
/// Creates a posting. Embedding generation is best-effort: a posting without
/// one is still reachable through the keyword path, so an AI-service failure
/// degrades to a null embedding instead of rejecting the posting.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.role.trim().is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }

    let embedding_request = JobEmbeddingRequest {
        role: &req.role,
        description: &req.description,
        requirements: &req.requirements,
        location: req.location.as_deref(),
        work_mode: req.work_mode.map(|m| m.as_str()),
        job_type: req.job_type.as_deref(),
        duration_months: req.duration_months,
        company_name: req.company_name.as_deref(),
    };
    let embedding = match state.ai.job_embedding(&embedding_request).await {
        Ok(vector) => Some(json!(vector)),
        Err(err) => {
            warn!(error = %err, "job embedding generation failed; storing posting without one");
            None
        }
    };

    let row: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (company_id, company_name, role, description, requirements, location,
             work_mode, job_type, duration_months, stipend_amount, stipend_currency,
             stipend_type, embedding)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(req.company_id)
    .bind(&req.company_name)
    .bind(&req.role)
    .bind(&req.description)
    .bind(&req.requirements)
    .bind(&req.location)
    .bind(req.work_mode.map(|m| m.as_str()))
    .bind(&req.job_type)
    .bind(req.duration_months)
    .bind(req.stipend_amount)
    .bind(&req.stipend_currency)
    .bind(&req.stipend_type)
    .bind(embedding)
    .fetch_one(&state.db)
    .await?;

    info!(job_id = %row.id, company_id = %row.company_id, has_embedding = row.embedding.is_some(), "job posting created");
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
pub struct CompanyIdQuery {
    pub company_id: Uuid,
}

/// GET /api/v1/jobs?company_id=
/// A company's postings, newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<CompanyIdQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let rows: Vec<JobRow> =
        sqlx::query_as("SELECT * FROM jobs WHERE company_id = $1 ORDER BY created_at DESC")
            .bind(params.company_id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}
