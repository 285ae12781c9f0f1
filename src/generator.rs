//! Application Generator
//!
//! Pairs the selected job with a resume, has the backend tailor the
//! document source and render it, then drives the outreach email for the
//! resulting application.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::Backend;
use crate::busy::BusyFlag;
use crate::error::{FlowError, FlowResult};
use crate::models::{EmailDraft, Job, MatchAnalysis, Resume, ResumeFile, ResumeId, TrackingId};

pub const DEFAULT_PROMPT: &str =
    "Enhance my resume for this job. Improve the impact of my bullet points.";

/// Canned tailoring instructions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptPreset {
    Safe,
    Impact,
}

impl PromptPreset {
    pub fn text(&self) -> &'static str {
        match self {
            PromptPreset::Safe => "Optimize for ATS keywords, preserve details.",
            PromptPreset::Impact => "Enhance impact. Quantify achievements.",
        }
    }
}

impl std::str::FromStr for PromptPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(PromptPreset::Safe),
            "impact" => Ok(PromptPreset::Impact),
            other => Err(format!("unknown preset: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Draft,
    PdfReady,
    Sent,
}

/// Reject a draft that has nowhere to go
pub(crate) fn check_recipient(draft: &EmailDraft) -> FlowResult<()> {
    if draft.hr_email.trim().is_empty() {
        Err(FlowError::precondition("HR email is required"))
    } else {
        Ok(())
    }
}

pub struct ApplicationGenerator {
    backend: Arc<dyn Backend>,
    job: Job,
    resumes: Vec<Resume>,
    selected_resume_id: Option<ResumeId>,
    prompt: String,
    tracking_id: Option<TrackingId>,
    drafted_with: Option<ResumeId>,
    pdf_url: Option<String>,
    stage: Stage,
    match_analysis: Option<MatchAnalysis>,
    email: Option<EmailDraft>,
    loading: BusyFlag,
}

impl ApplicationGenerator {
    /// Start a generator for `job`, defaulting to the first resume
    pub fn new(backend: Arc<dyn Backend>, job: Job, resumes: Vec<Resume>) -> Self {
        let selected_resume_id = resumes.first().map(|r| r.id);
        Self {
            backend,
            job,
            resumes,
            selected_resume_id,
            prompt: DEFAULT_PROMPT.to_string(),
            tracking_id: None,
            drafted_with: None,
            pdf_url: None,
            stage: Stage::Draft,
            match_analysis: None,
            email: None,
            loading: BusyFlag::new(),
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn resumes(&self) -> &[Resume] {
        &self.resumes
    }

    pub fn selected_resume_id(&self) -> Option<ResumeId> {
        self.selected_resume_id
    }

    pub fn selected_resume(&self) -> Option<&Resume> {
        let id = self.selected_resume_id?;
        self.resumes.iter().find(|r| r.id == id)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn tracking_id(&self) -> Option<TrackingId> {
        self.tracking_id
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.pdf_url.as_deref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn match_analysis(&self) -> Option<&MatchAnalysis> {
        self.match_analysis.as_ref()
    }

    pub fn email(&self) -> Option<&EmailDraft> {
        self.email.as_ref()
    }

    /// Editable email draft, once prepared
    pub fn email_mut(&mut self) -> Option<&mut EmailDraft> {
        self.email.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn select_resume(&mut self, id: ResumeId) -> FlowResult<()> {
        if !self.resumes.iter().any(|r| r.id == id) {
            return Err(FlowError::precondition(format!("Unknown resume {}", id)));
        }
        self.selected_resume_id = Some(id);
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn apply_preset(&mut self, preset: PromptPreset) {
        self.prompt = preset.text().to_string();
    }

    /// Create (or reuse) the draft application, tailor and render it
    ///
    /// A draft is reused while the selected resume is unchanged. Returns
    /// the absolute PDF URL.
    pub async fn generate(&mut self) -> FlowResult<String> {
        let resume_id = self
            .selected_resume_id
            .ok_or_else(|| FlowError::precondition("Select a resume first"))?;
        let _busy = self.loading.acquire()?;
        self.run_generate(resume_id).await
    }

    async fn run_generate(&mut self, resume_id: ResumeId) -> FlowResult<String> {
        let tracking_id = match self.tracking_id {
            Some(id) if self.drafted_with == Some(resume_id) => id,
            _ => {
                let id = self.backend.create_application(self.job.id, resume_id).await?;
                tracing::info!(tracking_id = id, job_id = self.job.id, resume_id, "Draft application created");
                self.tracking_id = Some(id);
                self.drafted_with = Some(resume_id);
                self.pdf_url = None;
                self.stage = Stage::Draft;
                id
            }
        };

        let code = self.backend.generate_code(tracking_id, &self.prompt).await?;
        let path = self.backend.generate_pdf(tracking_id, &code).await?;
        let url = self.backend.resolve_media_url(&path);
        tracing::info!(tracking_id, pdf_url = %url, "Document rendered");

        self.pdf_url = Some(url.clone());
        self.stage = Stage::PdfReady;
        Ok(url)
    }

    pub async fn analyze_match(&mut self) -> FlowResult<&MatchAnalysis> {
        let tracking_id = self.require_tracking_id()?;
        let _busy = self.loading.acquire()?;
        let analysis = self.backend.analyze_match(tracking_id).await?;
        Ok(&*self.match_analysis.insert(analysis))
    }

    /// Fetch a generated email for the rendered application
    pub async fn prepare_email(&mut self) -> FlowResult<&EmailDraft> {
        let tracking_id = self.require_tracking_id()?;
        if self.pdf_url.is_none() {
            return Err(FlowError::precondition("Generate the document first"));
        }
        let _busy = self.loading.acquire()?;
        let draft = self.backend.generate_email_draft(tracking_id).await?;
        Ok(&*self.email.insert(draft))
    }

    /// Send the (possibly edited) email draft
    pub async fn send_email(&mut self) -> FlowResult<()> {
        let tracking_id = self.require_tracking_id()?;
        let draft = self
            .email
            .clone()
            .ok_or_else(|| FlowError::precondition("Prepare the email first"))?;
        check_recipient(&draft)?;
        let _busy = self.loading.acquire()?;
        self.backend.send_email(tracking_id, &draft).await?;
        tracing::info!(tracking_id, to = %draft.hr_email, "Application email sent");
        self.stage = Stage::Sent;
        Ok(())
    }

    /// Replace the generated document with a signed copy
    pub async fn upload_signed(&mut self, file: ResumeFile) -> FlowResult<()> {
        let tracking_id = self.require_tracking_id()?;
        let _busy = self.loading.acquire()?;
        Ok(self.backend.upload_final(tracking_id, &file).await?)
    }

    fn require_tracking_id(&self) -> FlowResult<TrackingId> {
        self.tracking_id
            .ok_or_else(|| FlowError::precondition("No draft application yet"))
    }
}
