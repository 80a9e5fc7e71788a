use tracing::warn;

use crate::models::job::JobRow;

use super::embedding::{cosine_similarity, Embedding};
use super::error::MatchError;
use super::jitter::JitterSampler;

/// Minimum percentage a posting must reach to be returned by this path.
pub const MIN_SCORE: u32 = 70;
/// Ceiling for vector-path percentages; no match is presented as perfect.
pub const SCORE_CAP: f64 = 90.0;

// Weak-but-nonzero similarities are systematically underestimated by the
// embedding model at the low end; the two boost bands compensate.
const WEAK_BAND_END: f64 = 20.0;
const WEAK_BOOST: f64 = 1.5;
const LOW_BAND_END: f64 = 40.0;
const LOW_BOOST: f64 = 1.2;
const JITTER_HALF_RANGE: f64 = 1.5;

/// A posting scored by the vector path.
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub job: JobRow,
    /// Adjusted display percentage in `[0, SCORE_CAP]`.
    pub score: u32,
    /// Raw cosine similarity the score was derived from.
    pub similarity: f32,
}

/// Ranks postings by cosine similarity against the candidate's resume
/// embedding, then applies the score-adjustment policy, the minimum-score
/// filter, and the result cap — in that order, so the returned N are all
/// above threshold.
///
/// Postings whose vector length differs from the query are skipped with a
/// warning rather than failing the whole pass.
pub fn rank_by_similarity(
    query: &Embedding,
    jobs: Vec<(JobRow, Embedding)>,
    top_n: usize,
    jitter: &mut JitterSampler,
) -> Result<Vec<VectorMatch>, MatchError> {
    let mut scored = Vec::with_capacity(jobs.len());

    for (job, vector) in jobs {
        if vector.len() != query.len() {
            warn!(
                job_id = %job.id,
                expected = query.len(),
                actual = vector.len(),
                "skipping posting with mismatched embedding dimensions"
            );
            continue;
        }

        let similarity = cosine_similarity(query.as_slice(), vector.as_slice())?;
        let score = adjust_score(f64::from(similarity) * 100.0, jitter);
        scored.push(VectorMatch {
            job,
            score,
            similarity,
        });
    }

    // Stable sort: source order (newest posting first) breaks exact ties.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.retain(|m| m.score >= MIN_SCORE);
    scored.truncate(top_n);
    Ok(scored)
}

/// Score-adjustment policy: boost the low bands, add jitter, round, and clamp
/// into `[0, SCORE_CAP]`.
fn adjust_score(raw_percentage: f64, jitter: &mut JitterSampler) -> u32 {
    let boosted = if raw_percentage > 0.0 && raw_percentage < WEAK_BAND_END {
        raw_percentage * WEAK_BOOST
    } else if (WEAK_BAND_END..LOW_BAND_END).contains(&raw_percentage) {
        raw_percentage * LOW_BOOST
    } else {
        raw_percentage
    };

    let jittered = boosted + jitter.symmetric(JITTER_HALF_RANGE);
    jittered.round().clamp(0.0, SCORE_CAP) as u32
}
