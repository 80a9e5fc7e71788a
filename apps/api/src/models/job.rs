#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. Read-only as far as the matching core is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Denormalized for display resilience when the company profile is gone.
    pub company_name: Option<String>,
    pub role: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub job_type: Option<String>,
    pub duration_months: Option<i32>,
    pub stipend_amount: Option<f64>,
    pub stipend_currency: Option<String>,
    pub stipend_type: Option<String>,
    /// Omitted from API responses.
    #[serde(skip_serializing, default)]
    pub embedding: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Work arrangement for a posting. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Onsite => "onsite",
            WorkMode::Hybrid => "hybrid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_mode_serde_lowercase() {
        let mode: WorkMode = serde_json::from_str(r#""remote""#).unwrap();
        assert_eq!(mode, WorkMode::Remote);
        assert_eq!(serde_json::to_string(&WorkMode::Hybrid).unwrap(), r#""hybrid""#);
    }

    #[test]
    fn test_work_mode_as_str_round_trips() {
        for mode in [WorkMode::Remote, WorkMode::Onsite, WorkMode::Hybrid] {
            let parsed: WorkMode =
                serde_json::from_str(&format!("\"{}\"", mode.as_str())).unwrap();
            assert_eq!(parsed, mode);
        }
    }
}
