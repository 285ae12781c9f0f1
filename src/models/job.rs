//! Job postings

use serde::{Deserialize, Serialize};

use super::JobId;

/// Source label attached to jobs entered through the manual form
pub const MANUAL_ENTRY_SOURCE: &str = "Manual Entry";

fn default_source() -> String {
    "Google Jobs".to_string()
}

/// A job posting as returned by `GET /api/jobs/`
///
/// Read-only from the client's perspective: created by a backend scrape or a
/// manual submission, removed only through an explicit delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub career_page: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub hr_email: Option<String>,
    #[serde(default)]
    pub scraped_at: Option<String>,
    #[serde(default)]
    pub verification_status: Option<String>,
}

impl Job {
    /// Minimal job with only the fields the views require
    pub fn new(id: JobId, title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            company: company.into(),
            location: None,
            source: default_source(),
            link: String::new(),
            description: None,
            career_page: None,
            employment_type: None,
            hr_email: None,
            scraped_at: None,
            verification_status: None,
        }
    }

    /// One-line label used by list views ("title at company")
    pub fn label(&self) -> String {
        format!("{} at {}", self.title, self.company)
    }
}

/// Body of `POST /api/jobs/`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub link: String,
    pub description: String,
    pub source: String,
}
