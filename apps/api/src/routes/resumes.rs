use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use aws_sdk_s3::primitives::ByteStream;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/resumes (multipart: `user_id`, `file`)
///
/// Stores the uploaded PDF in S3, delegates parsing and embedding generation
/// to the AI service, then inserts a new resume row. Append-only: every
/// upload is a fresh row and the matching core reads the newest one.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "user_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable user_id field: {e}")))?;
                user_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?,
                );
            }
            "file" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable file field: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("Missing user_id field".to_string()))?;
    let (filename, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing file field".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    // Persist the original PDF first so a parse failure never loses the upload.
    let s3_key = format!("resumes/{}/{}.pdf", user_id, Uuid::new_v4());
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(bytes.clone()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    let parsed = state
        .ai
        .parse_resume(&filename, bytes)
        .await
        .map_err(|e| AppError::Ai(format!("Resume parsing failed: {e}")))?;

    let row: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (user_id, file_url, parsed_text, skills, education, experience, embedding)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&s3_key)
    .bind(&parsed.parsed_text)
    .bind(json!(parsed.skills))
    .bind(json!(parsed.education))
    .bind(json!(parsed.experience))
    .bind(json!(parsed.embedding))
    .fetch_one(&state.db)
    .await?;

    info!(resume_id = %row.id, %user_id, skills = parsed.skills.len(), "resume ingested");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes?user_id=
/// The candidate's resume history, newest first. Embeddings stay server-side.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let rows: Vec<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(params.user_id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}
