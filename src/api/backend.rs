//! Backend seam
//!
//! Every remote operation the client depends on. [`super::ApiClient`] is the
//! HTTP implementation; the view controller and flows only see
//! `Arc<dyn Backend>`.

use async_trait::async_trait;

use super::dto::ApplyAllRequest;
use super::error::ApiResult;
use crate::models::{
    AnswerAnalysis, Application, ApplicationStatus, EmailDraft, InterviewStart, Job, JobId,
    MatchAnalysis, NewJob, NewResume, Resume, ResumeFile, ResumeId, SessionId, TrackingId,
    Transcript,
};

#[async_trait]
pub trait Backend: Send + Sync {
    // Jobs
    async fn list_jobs(&self) -> ApiResult<Vec<Job>>;
    async fn create_job(&self, job: &NewJob) -> ApiResult<Job>;
    async fn delete_job(&self, id: JobId) -> ApiResult<()>;
    /// Ask the backend to scrape for new postings; returns its status message
    async fn search_jobs(&self, keywords: &str) -> ApiResult<String>;
    /// Bulk draft/apply; returns the backend's status message
    async fn apply_all(&self, request: &ApplyAllRequest) -> ApiResult<String>;

    // Resumes
    async fn list_resumes(&self) -> ApiResult<Vec<Resume>>;
    async fn create_resume(&self, resume: &NewResume) -> ApiResult<Resume>;

    // Applications
    async fn list_applications(&self) -> ApiResult<Vec<Application>>;
    async fn create_application(&self, job_id: JobId, resume_id: ResumeId) -> ApiResult<TrackingId>;
    async fn update_status(&self, id: TrackingId, status: ApplicationStatus) -> ApiResult<Application>;
    async fn generate_code(&self, id: TrackingId, prompt: &str) -> ApiResult<String>;
    /// Render document source; returns the document URL as the backend reports it
    async fn generate_pdf(&self, id: TrackingId, latex_code: &str) -> ApiResult<String>;
    async fn generate_email_draft(&self, id: TrackingId) -> ApiResult<EmailDraft>;
    async fn send_email(&self, id: TrackingId, draft: &EmailDraft) -> ApiResult<()>;
    async fn analyze_match(&self, id: TrackingId) -> ApiResult<MatchAnalysis>;
    async fn upload_final(&self, id: TrackingId, file: &ResumeFile) -> ApiResult<()>;

    // Interview
    async fn start_interview(&self, job_id: JobId) -> ApiResult<InterviewStart>;
    /// Send one turn; returns the full updated transcript
    async fn interview_chat(&self, session_id: SessionId, message: &str) -> ApiResult<Transcript>;
    async fn analyze_answer(
        &self,
        session_id: SessionId,
        question: &str,
        answer: &str,
    ) -> ApiResult<AnswerAnalysis>;

    // Session and diagnostics
    async fn login(&self, username: &str, password: &str) -> ApiResult<String>;
    async fn logout(&self) -> ApiResult<()>;
    async fn debug_log(&self, msg: &str, context: &str) -> ApiResult<()>;

    /// Turn a backend-relative media path into an absolute URL
    fn resolve_media_url(&self, path: &str) -> String {
        path.to_string()
    }
}
