/// AI Service Client — the single point of entry for all calls to the
/// external AI processing service (PDF parsing, skill extraction, embedding
/// generation).
///
/// ARCHITECTURAL RULE: no other module may call the AI service directly.
/// The service is a black box that returns fixed-length numeric vectors;
/// nothing in this repo re-implements any of its numerical work.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::matching::embedding::EXPECTED_DIMENSIONS;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Structured output of `POST /parse-resume`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedResume {
    pub parsed_text: String,
    pub skills: Vec<String>,
    pub education: Vec<Value>,
    pub experience: Vec<Value>,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ParseResumeResponse {
    data: ParsedResume,
}

/// Request body for `POST /generate-job-embedding`. The service concatenates
/// the fields into one text before embedding, so optional fields are simply
/// omitted.
#[derive(Debug, Serialize)]
pub struct JobEmbeddingRequest<'a> {
    pub role: &'a str,
    pub description: &'a str,
    pub requirements: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct JobEmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct JobEmbeddingResponse {
    data: JobEmbeddingData,
}

/// The single AI-service client shared by all handlers.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forwards an uploaded PDF to the AI service and returns the parsed
    /// text, structured fields, and full-text embedding.
    pub async fn parse_resume(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ParsedResume, AiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/parse-resume", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: ParseResumeResponse = response.json().await?;
        warn_on_unexpected_dimensions(body.data.embedding.len());
        Ok(body.data)
    }

    /// Generates the full-text embedding for a job posting.
    pub async fn job_embedding(
        &self,
        request: &JobEmbeddingRequest<'_>,
    ) -> Result<Vec<f32>, AiError> {
        let response = self
            .client
            .post(format!("{}/generate-job-embedding", self.base_url))
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: JobEmbeddingResponse = response.json().await?;
        warn_on_unexpected_dimensions(body.data.embedding.len());
        Ok(body.data.embedding)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        Err(AiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// A non-384 vector is suspect but not rejected here; comparison against it
/// will be caught downstream.
fn warn_on_unexpected_dimensions(dimensions: usize) {
    if dimensions != EXPECTED_DIMENSIONS {
        warn!(
            dimensions,
            expected = EXPECTED_DIMENSIONS,
            "AI service returned an unexpected embedding dimensionality"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resume_response_shape() {
        let json = r#"{
            "success": true,
            "data": {
                "parsed_text": "some resume text",
                "skills": ["React", "Node"],
                "education": [{"degree": "Bachelor", "year": "2023"}],
                "experience": [],
                "embedding": [0.1, 0.2],
                "embedding_dimensions": 2,
                "text_length": 16
            }
        }"#;
        let parsed: ParseResumeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.skills, vec!["React", "Node"]);
        assert_eq!(parsed.data.embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_job_embedding_response_shape() {
        let json = r#"{"success": true, "data": {"embedding": [0.5, 0.25], "text_length": 40}}"#;
        let parsed: JobEmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.embedding, vec![0.5, 0.25]);
    }

    #[test]
    fn test_job_embedding_request_omits_absent_fields() {
        let request = JobEmbeddingRequest {
            role: "Engineer",
            description: "desc",
            requirements: "req",
            location: None,
            work_mode: Some("remote"),
            job_type: None,
            duration_months: None,
            company_name: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("work_mode"));
        assert!(!object.contains_key("location"));
        assert!(!object.contains_key("duration_months"));
    }
}
