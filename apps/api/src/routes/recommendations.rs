use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::embedding::Embedding;
use crate::matching::engine::{explain_match, MatchExplanation, RecommendOptions, RecommendationResponse};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub user_id: Uuid,
    pub top_n: Option<usize>,
}

/// GET /api/v1/recommendations
///
/// Ranks the job pool against the candidate's latest resume. Empty result
/// sets (no resume yet, no jobs yet) are successful responses with guidance
/// text in `message`.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let opts = RecommendOptions {
        top_n: params.top_n.unwrap_or_else(|| RecommendOptions::default().top_n),
    };
    let response = state
        .recommender
        .recommend(state.store.as_ref(), params.user_id, opts)
        .await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct ExplainRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
}

/// POST /api/v1/recommendations/explain
///
/// Similarity breakdown for one candidate/posting pair. Requires both sides
/// to carry an embedding; a dimension mismatch is surfaced, not recovered.
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<MatchExplanation>, AppError> {
    let resume = state
        .store
        .latest_resume(req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume on file for this candidate".to_string()))?;
    let resume_value = resume
        .embedding
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Resume has no embedding".to_string()))?;
    let resume_embedding = Embedding::from_value(resume_value)?;

    let job = state
        .store
        .job_by_id(req.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    let job_value = job
        .embedding
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Job has no embedding".to_string()))?;
    let job_embedding = Embedding::from_value(job_value)?;

    let mut companies = state.store.companies_by_ids(&[job.company_id]).await?;
    let company_name = companies
        .remove(&job.company_id)
        .map(|c| c.company_name)
        .or_else(|| job.company_name.clone())
        .unwrap_or_else(|| "Company".to_string());

    let explanation = explain_match(&resume, &resume_embedding, &job, &job_embedding, company_name)?;
    Ok(Json(explanation))
}
