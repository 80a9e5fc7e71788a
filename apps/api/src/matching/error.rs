use thiserror::Error;

/// Errors produced by the matching core.
///
/// `NoResume` / `NoJobs` are deliberately absent: an empty recommendation
/// list is a valid business outcome and is modeled as a successful response
/// with guidance text, not an error.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Two vectors of unequal length were compared. Never silently truncated
    /// or padded.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A stored embedding could not be parsed into a numeric sequence.
    #[error("invalid embedding format: {0}")]
    InvalidEmbeddingFormat(String),

    /// A read against the backing store failed. Propagated as a failure of
    /// the whole recommendation request, never retried here.
    #[error("store read failed: {0}")]
    Store(#[from] sqlx::Error),
}
