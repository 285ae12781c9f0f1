//! Applications and their pipeline status

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::{Job, Resume, TrackingId};

/// Pipeline status of an application
///
/// The backend validates the nominal ordering
/// `draft -> sent -> interview -> offer | rejected`; the client does not, and
/// allows any move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Sent,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Kanban column order
    pub fn all() -> &'static [ApplicationStatus] {
        &[
            ApplicationStatus::Draft,
            ApplicationStatus::Sent,
            ApplicationStatus::Interview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Sent => "sent",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Column heading shown on the board
    pub fn column_title(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "DRAFTS",
            ApplicationStatus::Sent => "APPLIED",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ApplicationStatus::Draft),
            "sent" | "applied" => Ok(ApplicationStatus::Sent),
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {}", other)),
        }
    }
}

/// Missing, null, or unrecognised statuses land in the draft column.
fn lenient_status<'de, D>(deserializer: D) -> Result<ApplicationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.parse().ok())
        .unwrap_or(ApplicationStatus::Draft))
}

/// An application as returned by `GET /api/applications/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub tracking_id: TrackingId,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub resume: Option<Resume>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ApplicationStatus,
    /// URL of the rendered or uploaded document
    #[serde(default)]
    pub final_resume_file: Option<String>,
    #[serde(default)]
    pub altered_code: Option<String>,
    #[serde(default)]
    pub hr_name: Option<String>,
    #[serde(default)]
    pub hr_email: Option<String>,
    #[serde(default)]
    pub email_body: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Application {
    pub fn new(tracking_id: TrackingId, status: ApplicationStatus) -> Self {
        Self {
            tracking_id,
            job: None,
            resume: None,
            status,
            final_resume_file: None,
            altered_code: None,
            hr_name: None,
            hr_email: None,
            email_body: None,
            sent_at: None,
            notes: None,
        }
    }

    /// Builder method: attach the job
    pub fn with_job(mut self, job: Job) -> Self {
        self.job = Some(job);
        self
    }

    pub fn job_title(&self) -> &str {
        self.job.as_ref().map(|j| j.title.as_str()).unwrap_or("")
    }

    pub fn company(&self) -> &str {
        self.job.as_ref().map(|j| j.company.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("interview".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Interview);
        assert_eq!(" Offer ".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Offer);
        assert!("pending".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_missing_or_unknown_status_is_draft() {
        let app: Application = serde_json::from_str(r#"{"tracking_id": 3}"#).unwrap();
        assert_eq!(app.status, ApplicationStatus::Draft);

        let app: Application =
            serde_json::from_str(r#"{"tracking_id": 4, "status": null}"#).unwrap();
        assert_eq!(app.status, ApplicationStatus::Draft);

        let app: Application =
            serde_json::from_str(r#"{"tracking_id": 5, "status": "pdf_ready"}"#).unwrap();
        assert_eq!(app.status, ApplicationStatus::Draft);
    }

    #[test]
    fn test_default_status_is_draft() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Draft);
        assert_eq!(Application::new(1, Default::default()).status, ApplicationStatus::Draft);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }

    #[test]
    fn test_nested_job_is_read() {
        let app: Application = serde_json::from_str(
            r#"{"tracking_id": 9, "status": "sent", "job": {"id": 2, "title": "SWE", "company": "Acme"}}"#,
        )
        .unwrap();
        assert_eq!(app.status, ApplicationStatus::Sent);
        assert_eq!(app.company(), "Acme");
    }
}
