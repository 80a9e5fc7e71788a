use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::CompanyRow;
use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;

/// Read side the recommendation engine runs against.
///
/// The engine never writes; everything here is a read of the resume, job, or
/// company tables. Implemented by `PgMatchStore` in production and by
/// in-memory fixtures in the engine tests.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// The most recently uploaded resume for a candidate, if any.
    async fn latest_resume(&self, user_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error>;

    /// Postings that carry an embedding, newest first.
    async fn jobs_with_embeddings(&self) -> Result<Vec<JobRow>, sqlx::Error>;

    /// The complete job pool, newest first.
    async fn all_jobs(&self) -> Result<Vec<JobRow>, sqlx::Error>;

    async fn job_by_id(&self, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error>;

    /// Company display profiles keyed by owning user id.
    async fn companies_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CompanyRow>, sqlx::Error>;
}

pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn latest_resume(&self, user_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn jobs_with_embeddings(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM jobs WHERE embedding IS NOT NULL ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn all_jobs(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn job_by_id(&self, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn companies_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CompanyRow>, sqlx::Error> {
        let rows: Vec<CompanyRow> = sqlx::query_as(
            "SELECT user_id, company_name, logo_url, industry, location, website \
             FROM companies WHERE user_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|c| (c.user_id, c)).collect())
    }
}
