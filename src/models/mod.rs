//! Domain records exchanged with the backend
//!
//! All entities are owned by the backend system of record. The client holds
//! read replicas and never enforces invariants on their internals beyond
//! what is needed to render and address them.
//!
//! - [`Job`]: a scraped or manually entered job posting
//! - [`Resume`]: an uploaded base resume
//! - [`Application`]: a job/resume pairing tracked through the pipeline
//! - [`Transcript`]: the ordered turns of a mock-interview session

mod analysis;
mod application;
mod interview;
mod job;
mod resume;

pub use analysis::{AnswerAnalysis, Communication, EmailDraft, MatchAnalysis};
pub use application::{Application, ApplicationStatus};
pub use interview::{InterviewStart, Role, Transcript, Turn};
pub use job::{Job, NewJob, MANUAL_ENTRY_SOURCE};
pub use resume::{NewResume, Resume, ResumeFile};

/// Job identifier
pub type JobId = i64;

/// Resume identifier
pub type ResumeId = i64;

/// Application tracking id, used to address every application sub-resource
pub type TrackingId = i64;

/// Interview session identifier
pub type SessionId = i64;
