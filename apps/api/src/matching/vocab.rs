/// Fixed keyword vocabularies driving the keyword ranker.
///
/// Injectable configuration rather than literals inside the scoring loop, so
/// the lists can be versioned and tested independently of the algorithm. All
/// terms are lowercase; matching is case-insensitive substring containment.
#[derive(Debug, Clone)]
pub struct KeywordVocabulary {
    /// Language/framework/tooling names matched between resume text and all
    /// three job fields.
    pub technology: Vec<String>,
    /// Education terms matched between resume text and job requirements.
    pub education: Vec<String>,
    /// Seniority terms matched between resume text and requirements or role.
    pub experience: Vec<String>,
    /// Industry terms matched between resume text and job description.
    pub domain: Vec<String>,
    /// Junior/intern-oriented terms; a blanket bonus on the posting itself,
    /// independent of the candidate.
    pub entry_level: Vec<String>,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        Self {
            technology: terms(&[
                "javascript",
                "python",
                "java",
                "react",
                "node",
                "sql",
                "api",
                "web",
                "software",
                "developer",
                "engineer",
                "frontend",
                "backend",
                "fullstack",
                "database",
                "cloud",
                "aws",
                "azure",
                "docker",
                "kubernetes",
                "html",
                "css",
                "typescript",
                "mongodb",
                "postgresql",
                "mysql",
                "git",
                "linux",
                "windows",
            ]),
            education: terms(&[
                "bachelor",
                "master",
                "phd",
                "degree",
                "graduate",
                "university",
                "college",
            ]),
            experience: terms(&[
                "intern", "junior", "senior", "lead", "manager", "entry", "fresher",
            ]),
            domain: terms(&[
                "fintech",
                "healthcare",
                "ecommerce",
                "startup",
                "enterprise",
                "technology",
                "software",
            ]),
            entry_level: terms(&["intern", "trainee", "junior", "entry", "graduate"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_are_populated() {
        let vocab = KeywordVocabulary::default();
        assert!(!vocab.technology.is_empty());
        assert!(!vocab.education.is_empty());
        assert!(!vocab.experience.is_empty());
        assert!(!vocab.domain.is_empty());
        assert!(!vocab.entry_level.is_empty());
    }

    #[test]
    fn test_all_terms_are_lowercase() {
        let vocab = KeywordVocabulary::default();
        let all = vocab
            .technology
            .iter()
            .chain(&vocab.education)
            .chain(&vocab.experience)
            .chain(&vocab.domain)
            .chain(&vocab.entry_level);
        for term in all {
            assert_eq!(term, &term.to_lowercase(), "term {term:?} is not lowercase");
        }
    }
}
