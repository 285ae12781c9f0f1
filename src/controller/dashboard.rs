//! Dashboard Controller
//!
//! Single owner of navigation state and the three entity stores. Intents
//! from the front end (tab clicks, start-flow buttons, drops, form
//! submissions) come in here; it mutates navigation, dispatches backend
//! calls, and routes every failure to the notification queue as well as
//! back to the caller.

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::notifications::Notifier;
use super::view::{Navigation, Tab, ViewKind, ViewState};
use crate::api::{ApiResult, ApplyAllRequest, Backend};
use crate::busy::BusyFlag;
use crate::diagnostics::{DiagnosticSink, LocalSink};
use crate::error::{FlowError, FlowResult};
use crate::forms::{ManualJobForm, ResumeForm};
use crate::generator::ApplicationGenerator;
use crate::interview::{FailedTurnPolicy, InterviewCoach};
use crate::models::{Application, ApplicationStatus, Job, JobId, Resume, TrackingId};
use crate::outreach::EmailOutreach;
use crate::pipeline::{Board, DropEvent};
use crate::store::{EntityStore, StoreName};

#[derive(Clone)]
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    jobs: EntityStore<Job>,
    resumes: EntityStore<Resume>,
    applications: EntityStore<Application>,
    nav: Arc<RwLock<Navigation>>,
    notifier: Arc<Notifier>,
    sink: Arc<dyn DiagnosticSink>,
    busy: BusyFlag,
    failed_turn: FailedTurnPolicy,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            jobs: EntityStore::new(),
            resumes: EntityStore::new(),
            applications: EntityStore::new(),
            nav: Arc::new(RwLock::new(Navigation::new())),
            notifier: Arc::new(Notifier::new()),
            sink: Arc::new(LocalSink),
            busy: BusyFlag::new(),
            failed_turn: FailedTurnPolicy::default(),
        }
    }

    /// Builder method: inject the diagnostic side channel
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Builder method: policy handed to interview coaches
    pub fn with_failed_turn_policy(mut self, policy: FailedTurnPolicy) -> Self {
        self.failed_turn = policy;
        self
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn jobs(&self) -> &EntityStore<Job> {
        &self.jobs
    }

    pub fn resumes(&self) -> &EntityStore<Resume> {
        &self.resumes
    }

    pub fn applications(&self) -> &EntityStore<Application> {
        &self.applications
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Copy of the navigation state
    pub async fn navigation(&self) -> Navigation {
        self.nav.read().await.clone()
    }

    pub async fn tab(&self) -> Tab {
        self.nav.read().await.tab()
    }

    pub async fn view(&self) -> ViewState {
        self.nav.read().await.view().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    // ----------------------------------------
    // Navigation
    // ----------------------------------------

    /// Switch tab, reset to the list view and fetch the tab's store
    ///
    /// Previous store contents stay readable while the fetch is in flight.
    pub async fn select_tab(&self, tab: Tab) -> ApiResult<()> {
        self.nav.write().await.select_tab(tab);
        self.sink.note(&format!("Switched to {} tab", tab));
        tracing::debug!(%tab, "Tab selected");

        match tab.store() {
            Some(store) => self.refresh(store).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Open the generator for `job`
    ///
    /// Fetches resumes first when the store is empty. A failed fetch is
    /// reported but does not block the transition.
    pub async fn begin_application_draft(&self, job: Job) -> FlowResult<()> {
        self.check_from_list(ViewKind::Generate).await?;

        if self.resumes.is_empty().await {
            // Already reported through the notifier; the generator opens with no choices
            let _ = self.refresh(StoreName::Resumes).await;
        }

        let job_id = job.id;
        self.nav.write().await.begin_generate(job)?;
        self.sink.note(&format!("Drafting application for job {}", job_id));
        Ok(())
    }

    pub async fn begin_interview(&self, job: Job) -> FlowResult<()> {
        let job_id = job.id;
        self.nav.write().await.begin_interview(job)?;
        self.sink.note(&format!("Starting interview for job {}", job_id));
        Ok(())
    }

    pub async fn begin_manual_job(&self) -> FlowResult<()> {
        self.nav.write().await.begin_manual_job()?;
        Ok(())
    }

    pub async fn return_to_list(&self) {
        self.nav.write().await.return_to_list();
    }

    async fn check_from_list(&self, to: ViewKind) -> FlowResult<()> {
        let nav = self.nav.read().await;
        if nav.view().is_list() {
            Ok(())
        } else {
            Err(super::view::NavigationError::InvalidTransition {
                from: nav.view().kind(),
                to,
            }
            .into())
        }
    }

    // ----------------------------------------
    // Stores
    // ----------------------------------------

    /// Re-fetch one store; failures keep the old contents and notify
    pub async fn refresh(&self, store: StoreName) -> ApiResult<usize> {
        let backend = self.backend.as_ref();
        let result = match store {
            StoreName::Jobs => self.jobs.refresh(backend).await,
            StoreName::Resumes => self.resumes.refresh(backend).await,
            StoreName::Applications => self.applications.refresh(backend).await,
        };
        if let Err(e) = &result {
            self.notifier
                .error(format!("Failed to load {}: {}", store, e.user_message()));
        }
        result
    }

    /// Refresh on a background task; abort the handle to cancel
    pub fn spawn_refresh(&self, store: StoreName) -> JoinHandle<ApiResult<usize>> {
        let dashboard = self.clone();
        tokio::spawn(async move { dashboard.refresh(store).await })
    }

    /// Report a failed flow and hand the error back
    fn report<T>(&self, context: &str, result: FlowResult<T>) -> FlowResult<T> {
        if let Err(e) = &result {
            if !matches!(e, FlowError::Busy) {
                self.notifier.error(format!("{}: {}", context, e.user_message()));
            }
        }
        result
    }

    // ----------------------------------------
    // Job actions
    // ----------------------------------------

    /// Ask the backend to scrape for new jobs, then reload the job list
    pub async fn search_jobs(&self, keywords: &str) -> FlowResult<String> {
        let result = self.try_search(keywords.trim()).await;
        let message = self.report("Search failed", result)?;

        self.notifier.success(message.clone());
        let _ = self.refresh(StoreName::Jobs).await;
        Ok(message)
    }

    async fn try_search(&self, keywords: &str) -> FlowResult<String> {
        if keywords.is_empty() {
            return Err(FlowError::precondition("Enter keywords to search"));
        }
        let _busy = self.busy.acquire()?;
        Ok(self.backend.search_jobs(keywords).await?)
    }

    /// Fire the bulk-apply request and show the applications it produced
    pub async fn apply_all(&self, request: ApplyAllRequest) -> FlowResult<String> {
        let result = self.try_apply_all(&request).await;
        let message = self.report("Apply all failed", result)?;

        self.notifier.success(message.clone());
        let _ = self.select_tab(Tab::Apps).await;
        Ok(message)
    }

    async fn try_apply_all(&self, request: &ApplyAllRequest) -> FlowResult<String> {
        let _busy = self.busy.acquire()?;
        Ok(self.backend.apply_all(request).await?)
    }

    pub async fn delete_job(&self, id: JobId) -> FlowResult<()> {
        let result = self.backend.delete_job(id).await.map_err(FlowError::from);
        self.report("Delete failed", result)?;

        tracing::info!(job_id = id, "Job deleted");
        let _ = self.refresh(StoreName::Jobs).await;
        Ok(())
    }

    /// Submit the manual job form, then go back to a refreshed list
    pub async fn submit_manual_job(&self, form: &mut ManualJobForm) -> FlowResult<Job> {
        let notifier = &self.notifier;
        let result = form
            .submit(self.backend.as_ref(), |job| {
                notifier.success(format!("Added {}", job.label()));
            })
            .await;
        let job = self.report("Failed to add job", result)?;

        self.return_to_list().await;
        let _ = self.refresh(StoreName::Jobs).await;
        Ok(job)
    }

    pub async fn submit_resume(&self, form: &mut ResumeForm) -> FlowResult<Resume> {
        let notifier = &self.notifier;
        let result = form
            .submit(self.backend.as_ref(), |resume| {
                notifier.success(format!("Uploaded {}", resume.name));
            })
            .await;
        let resume = self.report("Upload failed", result)?;

        let _ = self.refresh(StoreName::Resumes).await;
        Ok(resume)
    }

    // ----------------------------------------
    // Pipeline
    // ----------------------------------------

    pub async fn board(&self) -> Board {
        Board::from_applications(&self.applications.snapshot().await)
    }

    /// Apply a kanban drop
    ///
    /// Returns `false` when the drop needs no write. Otherwise the card
    /// moves locally, the status is written once, and the store is
    /// refetched whether or not the write succeeded.
    pub async fn move_application(&self, event: DropEvent) -> FlowResult<bool> {
        let Some(status) = event.target_status() else {
            return Ok(false);
        };
        self.set_status(event.tracking_id, status).await?;
        Ok(true)
    }

    /// Write a status unconditionally and reconcile by refetch
    pub async fn set_status(&self, id: TrackingId, status: ApplicationStatus) -> FlowResult<()> {
        self.applications
            .update_where(|app| app.tracking_id == id, |app| app.status = status)
            .await;
        self.sink
            .note(&format!("Moving application {} to {}", id, status));

        let result = self.backend.update_status(id, status).await;
        let _ = self.refresh(StoreName::Applications).await;

        self.report("Failed to move card", result.map_err(FlowError::from))?;
        Ok(())
    }

    // ----------------------------------------
    // Flows
    // ----------------------------------------

    /// Generator for the job in the current `Generate` view
    pub async fn generator(&self) -> Option<ApplicationGenerator> {
        let job = match self.view().await {
            ViewState::Generate { job } => job,
            _ => return None,
        };
        let resumes = self.resumes.snapshot().await;
        Some(ApplicationGenerator::new(self.backend.clone(), job, resumes))
    }

    /// Coach for the job in the current `Interview` view
    pub async fn interview_coach(&self) -> Option<InterviewCoach> {
        match self.view().await {
            ViewState::Interview { job } => Some(
                InterviewCoach::new(self.backend.clone(), job).with_policy(self.failed_turn),
            ),
            _ => None,
        }
    }

    /// Send the generator's email, then leave the generate view
    pub async fn send_application_email(&self, generator: &mut ApplicationGenerator) -> FlowResult<()> {
        let result = generator.send_email().await;
        self.report("Failed to send email", result)?;

        self.notifier.success("Email sent");
        self.return_to_list().await;
        let _ = self.refresh(StoreName::Applications).await;
        Ok(())
    }

    pub fn outreach(&self) -> EmailOutreach {
        EmailOutreach::new(self.backend.clone())
    }
}
