//! Email Outreach
//!
//! Standalone flow for emailing HR about an existing application: pick an
//! application, load a generated draft, edit it, send it.

use std::sync::Arc;

use crate::api::Backend;
use crate::busy::BusyFlag;
use crate::error::{FlowError, FlowResult};
use crate::generator::check_recipient;
use crate::models::{Application, EmailDraft, TrackingId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutreachMode {
    Select,
    Edit,
    Sent,
}

pub struct EmailOutreach {
    backend: Arc<dyn Backend>,
    applications: Vec<Application>,
    selected: Option<TrackingId>,
    draft: EmailDraft,
    mode: OutreachMode,
    loading: BusyFlag,
}

impl EmailOutreach {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            applications: Vec::new(),
            selected: None,
            draft: EmailDraft::default(),
            mode: OutreachMode::Select,
            loading: BusyFlag::new(),
        }
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn selected(&self) -> Option<TrackingId> {
        self.selected
    }

    pub fn mode(&self) -> OutreachMode {
        self.mode
    }

    pub fn draft(&self) -> &EmailDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EmailDraft {
        &mut self.draft
    }

    /// Load the application choices
    pub async fn load(&mut self) -> FlowResult<usize> {
        self.applications = self.backend.list_applications().await?;
        Ok(self.applications.len())
    }

    pub fn select(&mut self, tracking_id: TrackingId) {
        self.selected = Some(tracking_id);
    }

    /// Fetch a generated draft for the selected application and enter edit mode
    pub async fn review(&mut self) -> FlowResult<&EmailDraft> {
        let tracking_id = self
            .selected
            .ok_or_else(|| FlowError::precondition("Select an application first"))?;
        let _busy = self.loading.acquire()?;
        self.draft = self.backend.generate_email_draft(tracking_id).await?;
        self.mode = OutreachMode::Edit;
        Ok(&self.draft)
    }

    pub async fn send(&mut self) -> FlowResult<()> {
        if self.mode != OutreachMode::Edit {
            return Err(FlowError::precondition("Review a draft before sending"));
        }
        let tracking_id = self
            .selected
            .ok_or_else(|| FlowError::precondition("Select an application first"))?;
        check_recipient(&self.draft)?;
        let _busy = self.loading.acquire()?;
        self.backend.send_email(tracking_id, &self.draft).await?;
        tracing::info!(tracking_id, to = %self.draft.hr_email, "Outreach email sent");
        self.mode = OutreachMode::Sent;
        Ok(())
    }

    /// Leave edit mode without sending
    pub fn back(&mut self) {
        self.mode = OutreachMode::Select;
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }
}
