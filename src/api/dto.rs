//! Data Transfer Objects
//!
//! Request bodies and small response envelopes for backend endpoints.
//! Entity records themselves live in [`crate::models`].

use serde::{Deserialize, Serialize};

use crate::models::{ApplicationStatus, JobId, ResumeId, TrackingId, Transcript};

// ============================================
// JOB DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub keywords: &'a str,
}

/// Body of `POST /api/jobs/apply_all/`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ApplyAllRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<bool>,
    /// Serialized as an explicit `null` when unset
    pub resume_id: Option<ResumeId>,
}

/// `{"message": ...}` envelope used by action endpoints
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ============================================
// APPLICATION DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct CreateApplicationRequest {
    pub job_id: JobId,
    pub resume_id: ResumeId,
}

#[derive(Debug, Deserialize)]
pub struct CreatedApplication {
    pub tracking_id: TrackingId,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct GenerateCodeRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct RenderRequest<'a> {
    pub latex_code: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RenderedDocument {
    pub pdf_url: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailRequest<'a> {
    pub email_body: &'a str,
    pub hr_email: &'a str,
}

// ============================================
// INTERVIEW DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub messages: Transcript,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeAnswerRequest<'a> {
    pub question: &'a str,
    pub answer: &'a str,
}

// ============================================
// SESSION / DIAGNOSTICS DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DebugLogRequest<'a> {
    pub msg: &'a str,
    pub context: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_all_sends_null_resume() {
        let body = ApplyAllRequest {
            limit: Some(10),
            auto_approve: Some(false),
            resume_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["limit"], 10);
        assert_eq!(json["auto_approve"], false);
        assert!(json["resume_id"].is_null());
        assert!(json.as_object().unwrap().contains_key("resume_id"));
    }

    #[test]
    fn test_status_update_body() {
        let json = serde_json::to_string(&StatusUpdate {
            status: ApplicationStatus::Interview,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"interview"}"#);
    }
}
