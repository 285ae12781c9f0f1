//! Results of the backend's analysis endpoints

use serde::{Deserialize, Serialize};

/// Response of `POST /applications/{id}/analyze_match/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchAnalysis {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub tip: String,
}

impl MatchAnalysis {
    /// Scores above 70 are rendered as a strong match
    pub fn is_strong(&self) -> bool {
        self.score > 70.0
    }
}

/// Response of `POST /applications/{id}/generate_email_draft/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailDraft {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hr_email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_body: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Communication {
    #[serde(default)]
    pub tone: String,
}

/// Response of `POST /interview/{session_id}/analyze_answer/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerAnalysis {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub communication: Communication,
    #[serde(default)]
    pub feedback_summary: String,
    #[serde(default)]
    pub improved_version: String,
}
