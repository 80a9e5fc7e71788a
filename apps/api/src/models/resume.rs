#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A parsed resume. Append-only: re-uploading creates a new row, and the
/// matching core always operates on the newest row per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_url: Option<String>,
    pub parsed_text: Option<String>,
    /// JSON array of skill strings, or a JSON-encoded string of one.
    pub skills: Option<Value>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
    /// 384-dim vector as a JSON array, or a bracketed string ("[0.1,...]").
    /// Omitted from API responses.
    #[serde(skip_serializing, default)]
    pub embedding: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Skills as a plain list. Malformed stored values (double-encoded JSON,
    /// non-array shapes) degrade to an empty list rather than failing the
    /// ranking operation.
    pub fn skills_list(&self) -> Vec<String> {
        match &self.skills {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(Value::String(raw)) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.parsed_text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resume_with_skills(skills: Option<Value>) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            file_url: None,
            parsed_text: None,
            skills,
            education: None,
            experience: None,
            embedding: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_skills_from_json_array() {
        let resume = resume_with_skills(Some(json!(["React", "Node"])));
        assert_eq!(resume.skills_list(), vec!["React", "Node"]);
    }

    #[test]
    fn test_skills_from_encoded_string() {
        let resume = resume_with_skills(Some(json!(r#"["Python","SQL"]"#)));
        assert_eq!(resume.skills_list(), vec!["Python", "SQL"]);
    }

    #[test]
    fn test_malformed_skills_degrade_to_empty() {
        assert!(resume_with_skills(Some(json!("not json"))).skills_list().is_empty());
        assert!(resume_with_skills(Some(json!({"a": 1}))).skills_list().is_empty());
        assert!(resume_with_skills(None).skills_list().is_empty());
    }

    #[test]
    fn test_non_string_array_elements_are_skipped() {
        let resume = resume_with_skills(Some(json!(["React", 42, null, "Node"])));
        assert_eq!(resume.skills_list(), vec!["React", "Node"]);
    }
}
