//! # JobBot
//!
//! Client core for the JobBot job-application assistant. Holds the state
//! a front end needs (navigation, entity stores, the kanban pipeline,
//! generation, interview and outreach flows, automation scheduling) and
//! talks to the JobBot backend over its REST API.
//!
//! ## Modules
//!
//! - [`api`]: Backend trait and the HTTP client implementing it
//! - [`store`]: Replace-on-success caches of jobs, resumes and applications
//! - [`controller`]: Dashboard navigation state machine and notifications
//! - [`pipeline`]: Kanban board grouping and drop events
//! - [`generator`], [`interview`], [`outreach`]: Per-screen flows
//! - [`automation`]: Persisted bulk-apply settings and daily scheduler
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jobbot::{ApiClient, ClientConfig, Dashboard, Tab};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ApiClient::new(ClientConfig::default())?);
//!     let dashboard = Dashboard::new(client);
//!
//!     // Switching tabs fetches that tab's store
//!     dashboard.select_tab(Tab::Jobs).await?;
//!     let job = dashboard.jobs().snapshot().await.into_iter().next();
//!
//!     if let Some(job) = job {
//!         dashboard.begin_application_draft(job).await?;
//!         if let Some(mut generator) = dashboard.generator().await {
//!             let pdf = generator.generate().await?;
//!             println!("Tailored resume: {}", pdf);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod automation;
pub mod busy;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod forms;
pub mod generator;
pub mod interview;
pub mod logging;
pub mod models;
pub mod outreach;
pub mod pipeline;
pub mod routes;
pub mod store;

#[cfg(test)]
mod test_helpers;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, ApplyAllRequest, Backend, ClientConfig};

pub use models::{
    AnswerAnalysis, Application, ApplicationStatus, EmailDraft, Job, MatchAnalysis, Resume,
    ResumeFile, Role, Transcript, Turn,
};

pub use controller::{
    Dashboard, Level, Navigation, NavigationError, Notification, Notifier, Tab, ViewKind,
    ViewState,
};

pub use store::{EntityStore, StoreName};

pub use pipeline::{Board, Column, DropEvent, Slot};

pub use error::{FlowError, FlowResult};

pub use busy::{BusyFlag, BusyGuard};

pub use forms::{FormError, ManualJobForm, ResumeForm};

pub use generator::{ApplicationGenerator, PromptPreset, Stage};

pub use interview::{FailedTurnPolicy, InterviewCoach};

pub use outreach::{EmailOutreach, OutreachMode};

pub use analytics::{ChartPoint, FunnelStats};

pub use automation::{AutomationScheduler, AutomationSettings, RunStatus, SettingsError, SettingsStore};

pub use diagnostics::{DiagnosticSink, LocalSink, RemoteLogger};

pub use routes::{resolve, Resolution, Route};

pub use config::{Config, ConfigError, LoggingConfig};
