use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::ai_client::AiClient;
use crate::config::Config;
use crate::matching::engine::Recommender;
use crate::matching::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub ai: AiClient,
    pub config: Config,
    /// The recommendation orchestrator. Vocabulary and jitter source are
    /// fixed at startup.
    pub recommender: Arc<Recommender>,
    /// Read-side store the recommendation endpoints run against.
    pub store: Arc<dyn MatchStore>,
}
