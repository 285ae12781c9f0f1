//! Backend API
//!
//! Typed access to the job-application backend (base path `/api/`).
//!
//! # Endpoints
//!
//! ## Jobs
//! - `GET /jobs/`, `POST /jobs/`, `DELETE /jobs/{id}/`
//! - `POST /jobs/search/` - Scrape for new postings
//! - `POST /jobs/apply_all/` - Bulk draft/apply
//!
//! ## Resumes
//! - `GET /resumes/`, `POST /resumes/` (multipart)
//!
//! ## Applications
//! - `GET /applications/`, `POST /applications/`, `PATCH /applications/{id}/`
//! - `POST /applications/{id}/generate_code/`, `generate_pdf/`,
//!   `generate_email_draft/`, `send_email/`, `analyze_match/`,
//!   `upload_final/` (multipart)
//!
//! ## Interview
//! - `POST /interview/{job_id}/start/`
//! - `POST /interview/{session_id}/chat/`, `analyze_answer/`
//!
//! ## Session and diagnostics
//! - `GET /csrf/`, `POST /login/`, `POST /logout/`, `POST /debug_log/`

pub mod backend;
pub mod client;
pub mod dto;
pub mod error;

pub use backend::Backend;
pub use client::{ApiClient, ClientConfig, CSRF_COOKIE, CSRF_HEADER};
pub use dto::ApplyAllRequest;
pub use error::{ApiError, ApiResult, ErrorKind};
