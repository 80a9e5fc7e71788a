use std::cmp::Ordering;

use crate::models::job::JobRow;

use super::jitter::JitterSampler;
use super::vocab::KeywordVocabulary;

/// Minimum percentage a posting must reach to be returned by this path.
pub const MIN_SCORE: u32 = 65;
/// Display ceiling for keyword-path percentages.
pub const SCORE_CAP: u32 = 95;

// Additive weights per signal category.
const SKILL_IN_REQUIREMENTS: f64 = 35.0;
const SKILL_IN_DESCRIPTION: f64 = 30.0;
const SKILL_IN_ROLE: f64 = 25.0;
const TECH_IN_REQUIREMENTS: f64 = 15.0;
const TECH_IN_DESCRIPTION: f64 = 12.0;
const TECH_IN_ROLE: f64 = 8.0;
const EDUCATION_OVERLAP: f64 = 10.0;
const EXPERIENCE_OVERLAP: f64 = 15.0;
const DOMAIN_OVERLAP: f64 = 12.0;
const ENTRY_LEVEL_BONUS: f64 = 20.0;
const DAMPENER_MAX: f64 = 5.0;

/// A posting scored by the keyword path.
#[derive(Debug, Clone)]
pub struct KeywordMatch {
    pub job: JobRow,
    /// Display percentage, capped at `SCORE_CAP`.
    pub score: u32,
    /// Pre-cap score; ordering key, so ties at the cap keep their true
    /// relative strength.
    raw_score: f64,
}

impl KeywordMatch {
    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }
}

/// Ranks the full job pool against a candidate's skill list and resume text.
///
/// Scoring is purely additive across independent signal categories. A posting
/// with zero real overlap stays at zero — the dampener only applies to
/// postings that already matched something, so noise alone never surfaces a
/// job.
pub fn rank_by_keywords(
    skills: &[String],
    resume_text: &str,
    jobs: Vec<JobRow>,
    vocab: &KeywordVocabulary,
    top_n: usize,
    jitter: &mut JitterSampler,
) -> Vec<KeywordMatch> {
    let resume_text = resume_text.to_lowercase();
    // Blank entries would substring-match every posting.
    let skills: Vec<String> = skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut scored: Vec<KeywordMatch> = jobs
        .into_iter()
        .map(|job| {
            let raw_score = score_job(&skills, &resume_text, &job, vocab, jitter);
            let score = (raw_score.round() as u32).min(SCORE_CAP);
            KeywordMatch {
                job,
                score,
                raw_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(Ordering::Equal)
    });
    scored.retain(|m| m.score >= MIN_SCORE);
    scored.truncate(top_n);
    scored
}

fn score_job(
    skills: &[String],
    resume_text: &str,
    job: &JobRow,
    vocab: &KeywordVocabulary,
    jitter: &mut JitterSampler,
) -> f64 {
    let requirements = job.requirements.as_deref().unwrap_or("").to_lowercase();
    let description = job.description.as_deref().unwrap_or("").to_lowercase();
    let role = job.role.to_lowercase();

    let mut score = 0.0;

    // 1. Direct skill hits; a skill may contribute to several fields at once.
    for skill in skills {
        if requirements.contains(skill.as_str()) {
            score += SKILL_IN_REQUIREMENTS;
        }
        if description.contains(skill.as_str()) {
            score += SKILL_IN_DESCRIPTION;
        }
        if role.contains(skill.as_str()) {
            score += SKILL_IN_ROLE;
        }
    }

    // 2. Technology terms the resume and the posting share.
    for term in &vocab.technology {
        if !resume_text.contains(term.as_str()) {
            continue;
        }
        if requirements.contains(term.as_str()) {
            score += TECH_IN_REQUIREMENTS;
        }
        if description.contains(term.as_str()) {
            score += TECH_IN_DESCRIPTION;
        }
        if role.contains(term.as_str()) {
            score += TECH_IN_ROLE;
        }
    }

    // 3. Education-level co-occurrence.
    for term in &vocab.education {
        if resume_text.contains(term.as_str()) && requirements.contains(term.as_str()) {
            score += EDUCATION_OVERLAP;
        }
    }

    // 4. Experience-level co-occurrence.
    for term in &vocab.experience {
        if resume_text.contains(term.as_str())
            && (requirements.contains(term.as_str()) || role.contains(term.as_str()))
        {
            score += EXPERIENCE_OVERLAP;
        }
    }

    // 5. Industry/domain co-occurrence.
    for term in &vocab.domain {
        if resume_text.contains(term.as_str()) && description.contains(term.as_str()) {
            score += DOMAIN_OVERLAP;
        }
    }

    // 6. Blanket bonus for entry-level-friendly postings.
    for term in &vocab.entry_level {
        if role.contains(term.as_str()) || description.contains(term.as_str()) {
            score += ENTRY_LEVEL_BONUS;
        }
    }

    // 7. Dampener only on postings with real signal.
    if score > 0.0 {
        score += jitter.uniform(DAMPENER_MAX);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::jitter::Jitter;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(role: &str, description: &str, requirements: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_name: Some("Acme".to_string()),
            role: role.to_string(),
            description: Some(description.to_string()),
            requirements: Some(requirements.to_string()),
            location: None,
            work_mode: None,
            job_type: None,
            duration_months: None,
            stipend_amount: None,
            stipend_currency: None,
            stipend_type: None,
            embedding: None,
            created_at: Utc::now(),
        }
    }

    fn rank(skills: &[&str], text: &str, jobs: Vec<JobRow>, top_n: usize) -> Vec<KeywordMatch> {
        let skills: Vec<String> = skills.iter().map(|s| s.to_string()).collect();
        let mut sampler = Jitter::Disabled.sampler();
        rank_by_keywords(
            &skills,
            text,
            jobs,
            &KeywordVocabulary::default(),
            top_n,
            &mut sampler,
        )
    }

    #[test]
    fn test_react_node_candidate_matches_react_job() {
        // Skills hit requirements (2 × 35) and tech terms overlap on top.
        let jobs = vec![job(
            "Frontend Developer",
            "Build UIs for our platform",
            "React, Node, TypeScript",
        )];
        let results = rank(
            &["React", "Node"],
            "react node javascript",
            jobs,
            10,
        );

        assert_eq!(results.len(), 1);
        assert!(results[0].score >= MIN_SCORE);
        assert!(results[0].raw_score() >= 70.0, "raw {}", results[0].raw_score());
    }

    #[test]
    fn test_zero_overlap_job_is_filtered_out() {
        let jobs = vec![job("Accountant", "Bookkeeping", "CPA certification")];
        let results = rank(&["React"], "react frontend", jobs, 10);
        assert!(results.is_empty());
    }

    #[test]
    fn test_scores_stay_within_bounds() {
        // Pile on every category so the raw score is far past the cap.
        let jobs = vec![job(
            "Junior Software Developer Intern",
            "Entry level software startup role building react node javascript web apps",
            "React Node javascript python sql api web software developer bachelor degree intern",
        )];
        let results = rank(
            &["React", "Node", "Python", "SQL"],
            "react node javascript python sql api web software developer bachelor degree intern startup",
            jobs,
            10,
        );

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, SCORE_CAP);
    }

    #[test]
    fn test_results_sorted_by_descending_score() {
        let strong = job("React Developer", "react frontend work", "React and Node required");
        let weak = job("Developer", "general work", "React and Node required");
        let results = rank(&["React", "Node"], "react node", vec![weak, strong], 10);

        assert!(results.len() >= 2);
        for pair in results.windows(2) {
            assert!(pair[0].raw_score() >= pair[1].raw_score());
        }
        assert_eq!(results[0].job.role, "React Developer");
    }

    #[test]
    fn test_truncates_to_requested_count() {
        let jobs: Vec<JobRow> = (0..5)
            .map(|_| job("React Developer", "react work", "React and Node required"))
            .collect();
        let results = rank(&["React", "Node"], "react node", jobs, 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_blank_skills_do_not_match_everything() {
        let jobs = vec![job("Accountant", "Bookkeeping", "CPA certification")];
        let results = rank(&["", "  "], "nothing relevant", jobs, 10);
        assert!(results.is_empty());
    }

    #[test]
    fn test_entry_level_bonus_is_candidate_independent() {
        // No candidate overlap at all, only the blanket entry-level bonus:
        // two terms on the role, one on the description. Below threshold, but
        // the raw score proves the bonus applied.
        let j = job(
            "Graduate Intern",
            "trainee position",
            "nothing in common",
        );
        let mut sampler = Jitter::Disabled.sampler();
        let score = score_job(
            &[],
            "totally unrelated resume text",
            &j,
            &KeywordVocabulary::default(),
            &mut sampler,
        );
        assert_eq!(score, 3.0 * 20.0);
    }

    #[test]
    fn test_identical_input_gives_identical_scores() {
        let make_jobs = || {
            vec![
                job("React Developer", "react frontend", "React required"),
                job("Node Engineer", "node backend", "Node required"),
            ]
        };
        let a = rank(&["React", "Node"], "react node", make_jobs(), 10);
        let b = rank(&["React", "Node"], "react node", make_jobs(), 10);

        let scores_a: Vec<u32> = a.iter().map(|m| m.score).collect();
        let scores_b: Vec<u32> = b.iter().map(|m| m.score).collect();
        assert_eq!(scores_a, scores_b);
        let roles_a: Vec<&str> = a.iter().map(|m| m.job.role.as_str()).collect();
        let roles_b: Vec<&str> = b.iter().map(|m| m.job.role.as_str()).collect();
        assert_eq!(roles_a, roles_b);
    }

    #[test]
    fn test_dampener_never_lifts_zero_signal_jobs() {
        let j = job("Florist", "arranging flowers", "botany");
        let mut sampler = Jitter::Seeded(99).sampler();
        let score = score_job(
            &["React".to_string()],
            "react developer",
            &j,
            &KeywordVocabulary::default(),
            &mut sampler,
        );
        assert_eq!(score, 0.0);
    }
}
