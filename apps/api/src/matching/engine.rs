use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::company::CompanyRow;
use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;

use super::embedding::{cosine_similarity, Embedding, EXPECTED_DIMENSIONS};
use super::error::MatchError;
use super::jitter::Jitter;
use super::keyword::{self, rank_by_keywords};
use super::store::MatchStore;
use super::vector::{self, rank_by_similarity};
use super::vocab::KeywordVocabulary;

const NO_RESUME_MESSAGE: &str =
    "Please upload your resume first to get job recommendations";
const NO_JOBS_MESSAGE: &str =
    "No jobs are currently available. Companies need to post jobs first!";
const PLACEHOLDER_COMPANY: &str = "Company";

/// Which ranking strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    VectorSimilarity,
    KeywordMatching,
}

/// Company display metadata attached to every result. Falls back to the
/// denormalized name on the posting, then a placeholder, when no profile
/// exists — a missing profile is never an error.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDisplay {
    pub name: String,
    pub logo_url: Option<String>,
}

impl CompanyDisplay {
    fn for_job(job: &JobRow, companies: &HashMap<Uuid, CompanyRow>) -> Self {
        match companies.get(&job.company_id) {
            Some(profile) => Self {
                name: profile.company_name.clone(),
                logo_url: profile.logo_url.clone(),
            },
            None => Self {
                name: job
                    .company_name
                    .clone()
                    .unwrap_or_else(|| PLACEHOLDER_COMPANY.to_string()),
                logo_url: None,
            },
        }
    }
}

/// Posting fields exposed to callers; the embedding stays server-side.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub role: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub duration_months: Option<i32>,
    pub stipend: Stipend,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stipend {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub stipend_type: Option<String>,
}

impl From<JobRow> for JobSummary {
    fn from(job: JobRow) -> Self {
        Self {
            id: job.id,
            role: job.role,
            description: job.description,
            requirements: job.requirements,
            location: job.location,
            work_mode: job.work_mode,
            job_type: job.job_type,
            duration_months: job.duration_months,
            stipend: Stipend {
                amount: job.stipend_amount,
                currency: job.stipend_currency,
                stipend_type: job.stipend_type,
            },
            created_at: job.created_at,
        }
    }
}

/// One ranked, enriched recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// 1-based position in the final sorted list.
    pub rank: u32,
    pub job: JobSummary,
    pub company: CompanyDisplay,
    /// Display percentage in 0-100.
    pub score: u32,
    pub method: MatchMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationMetadata {
    pub search_method: Option<MatchMethod>,
    pub total_jobs_analyzed: usize,
    pub min_score_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<MatchResult>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub metadata: RecommendationMetadata,
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendOptions {
    pub top_n: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

/// The recommendation orchestrator.
///
/// Each request is a single pass through an explicit state machine:
/// FetchResume, RouteOnEmbedding, VectorPath or KeywordPath, Enrich, Respond.
/// Vector-path failures local to ranking (unparseable or mismatched
/// embeddings) degrade to the keyword path; store-read failures fail the
/// request. The terminal empty states are successful responses with guidance
/// text, because "nothing to show yet" is not "something broke".
pub struct Recommender {
    vocab: KeywordVocabulary,
    jitter: Jitter,
}

impl Recommender {
    pub fn new(vocab: KeywordVocabulary, jitter: Jitter) -> Self {
        Self { vocab, jitter }
    }

    pub async fn recommend(
        &self,
        store: &dyn MatchStore,
        user_id: Uuid,
        opts: RecommendOptions,
    ) -> Result<RecommendationResponse, MatchError> {
        // FetchResume
        let Some(resume) = store.latest_resume(user_id).await? else {
            info!(%user_id, "no resume on file; returning empty recommendations");
            return Ok(Self::empty_response(NO_RESUME_MESSAGE));
        };

        // RouteOnEmbedding
        let query = match resume.embedding.as_ref().map(Embedding::from_value) {
            Some(Ok(embedding)) => Some(embedding),
            Some(Err(err)) => {
                warn!(
                    resume_id = %resume.id,
                    error = %err,
                    "resume embedding unusable; routing to keyword path"
                );
                None
            }
            None => None,
        };

        if let Some(query) = query {
            match self.vector_path(store, &query, opts).await {
                Ok(Some(response)) => return Ok(response),
                Ok(None) => {
                    info!("no postings carry embeddings; falling through to keyword path");
                }
                Err(MatchError::Store(err)) => return Err(MatchError::Store(err)),
                Err(err) => {
                    warn!(error = %err, "vector path failed; falling back to keyword matching");
                }
            }
        }

        self.keyword_path(store, &resume, opts).await
    }

    /// VectorPath. `Ok(None)` means no posting carries an embedding, which
    /// routes the request to the keyword path instead of ending it.
    async fn vector_path(
        &self,
        store: &dyn MatchStore,
        query: &Embedding,
        opts: RecommendOptions,
    ) -> Result<Option<RecommendationResponse>, MatchError> {
        let jobs = store.jobs_with_embeddings().await?;
        if jobs.is_empty() {
            return Ok(None);
        }
        let analyzed = jobs.len();
        info!(postings = analyzed, "vector path: ranking postings by embedding similarity");

        let mut pairs = Vec::with_capacity(jobs.len());
        for job in jobs {
            match job.embedding.as_ref().map(Embedding::from_value) {
                Some(Ok(embedding)) => pairs.push((job, embedding)),
                Some(Err(err)) => {
                    warn!(job_id = %job.id, error = %err, "excluding posting with unparseable embedding");
                }
                None => {}
            }
        }

        let mut sampler = self.jitter.sampler();
        let ranked = rank_by_similarity(query, pairs, opts.top_n, &mut sampler)?;
        let scored: Vec<(JobRow, u32)> = ranked.into_iter().map(|m| (m.job, m.score)).collect();
        let recommendations = Self::enrich(store, scored, MatchMethod::VectorSimilarity).await?;

        Ok(Some(RecommendationResponse {
            total: recommendations.len(),
            recommendations,
            message: None,
            metadata: RecommendationMetadata {
                search_method: Some(MatchMethod::VectorSimilarity),
                total_jobs_analyzed: analyzed,
                min_score_threshold: Some(vector::MIN_SCORE),
                embedding_dimensions: Some(EXPECTED_DIMENSIONS),
            },
        }))
    }

    /// KeywordPath: scores the full pool, embeddings irrelevant.
    async fn keyword_path(
        &self,
        store: &dyn MatchStore,
        resume: &ResumeRow,
        opts: RecommendOptions,
    ) -> Result<RecommendationResponse, MatchError> {
        let jobs = store.all_jobs().await?;
        if jobs.is_empty() {
            info!("no jobs available; returning empty recommendations");
            return Ok(Self::empty_response(NO_JOBS_MESSAGE));
        }
        let analyzed = jobs.len();
        info!(postings = analyzed, "keyword path: scoring postings against resume skills and text");

        let skills = resume.skills_list();
        let mut sampler = self.jitter.sampler();
        let ranked = rank_by_keywords(
            &skills,
            resume.text(),
            jobs,
            &self.vocab,
            opts.top_n,
            &mut sampler,
        );
        let scored: Vec<(JobRow, u32)> = ranked.into_iter().map(|m| (m.job, m.score)).collect();
        let recommendations = Self::enrich(store, scored, MatchMethod::KeywordMatching).await?;

        Ok(RecommendationResponse {
            total: recommendations.len(),
            recommendations,
            message: None,
            metadata: RecommendationMetadata {
                search_method: Some(MatchMethod::KeywordMatching),
                total_jobs_analyzed: analyzed,
                min_score_threshold: Some(keyword::MIN_SCORE),
                embedding_dimensions: None,
            },
        })
    }

    /// Enrich: attach company display metadata, assign 1-based ranks.
    async fn enrich(
        store: &dyn MatchStore,
        scored: Vec<(JobRow, u32)>,
        method: MatchMethod,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let mut company_ids: Vec<Uuid> = scored.iter().map(|(job, _)| job.company_id).collect();
        company_ids.sort_unstable();
        company_ids.dedup();

        let companies = if company_ids.is_empty() {
            HashMap::new()
        } else {
            store.companies_by_ids(&company_ids).await?
        };

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(i, (job, score))| {
                let company = CompanyDisplay::for_job(&job, &companies);
                MatchResult {
                    rank: i as u32 + 1,
                    job: job.into(),
                    company,
                    score,
                    method,
                }
            })
            .collect())
    }

    fn empty_response(message: &str) -> RecommendationResponse {
        RecommendationResponse {
            recommendations: Vec::new(),
            total: 0,
            message: Some(message.to_string()),
            metadata: RecommendationMetadata {
                search_method: None,
                total_jobs_analyzed: 0,
                min_score_threshold: None,
                embedding_dimensions: None,
            },
        }
    }
}

/// Tiered label for a single-pair similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchQuality {
    High,
    Medium,
    Low,
}

impl MatchQuality {
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage >= 70.0 {
            MatchQuality::High
        } else if percentage >= 50.0 {
            MatchQuality::Medium
        } else {
            MatchQuality::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchQuality::High => "High",
            MatchQuality::Medium => "Medium",
            MatchQuality::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainedJob {
    pub id: Uuid,
    pub role: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationDetail {
    pub matching_skills: Vec<String>,
    pub skill_match_percentage: u32,
    pub key_factors: Vec<String>,
}

/// Detailed similarity breakdown for one candidate/posting pair.
#[derive(Debug, Clone, Serialize)]
pub struct MatchExplanation {
    pub similarity_score: f32,
    pub similarity_percentage: f32,
    pub match_quality: MatchQuality,
    pub job: ExplainedJob,
    pub explanation: ExplanationDetail,
}

/// Explains a single candidate/posting match. Unlike the recommendation flow
/// there is no fallback here: a dimension mismatch surfaces to the caller,
/// because this is the strict similarity-engine contract.
pub fn explain_match(
    resume: &ResumeRow,
    resume_embedding: &Embedding,
    job: &JobRow,
    job_embedding: &Embedding,
    company_name: String,
) -> Result<MatchExplanation, MatchError> {
    let similarity =
        cosine_similarity(resume_embedding.as_slice(), job_embedding.as_slice())?;
    let similarity_percentage = similarity * 100.0;
    let match_quality = MatchQuality::from_percentage(similarity_percentage);

    let skills = resume.skills_list();
    let requirements = job.requirements.as_deref().unwrap_or("").to_lowercase();
    let matching_skills: Vec<String> = skills
        .iter()
        .filter(|s| requirements.contains(&s.to_lowercase()))
        .cloned()
        .collect();
    let skill_match_percentage = if skills.is_empty() {
        0
    } else {
        ((matching_skills.len() as f64 / skills.len() as f64) * 100.0).round() as u32
    };

    let key_factors = vec![
        format!(
            "Skills alignment: {}/{} skills match",
            matching_skills.len(),
            skills.len()
        ),
        format!("Overall compatibility: {similarity_percentage:.1}%"),
        format!("Match quality: {}", match_quality.as_str()),
    ];

    Ok(MatchExplanation {
        similarity_score: similarity,
        similarity_percentage,
        match_quality,
        job: ExplainedJob {
            id: job.id,
            role: job.role.clone(),
            company: company_name,
        },
        explanation: ExplanationDetail {
            matching_skills,
            skill_match_percentage,
            key_factors,
        },
    })
}
