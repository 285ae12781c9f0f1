//! Entry Forms
//!
//! Manual job entry and resume upload. Both validate locally, post once,
//! and reset their fields only after the backend accepted the record.

use reqwest::Url;
use thiserror::Error;

use crate::api::Backend;
use crate::busy::BusyFlag;
use crate::error::FlowResult;
use crate::models::{Job, NewJob, NewResume, Resume, ResumeFile, MANUAL_ENTRY_SOURCE};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid link '{0}': expected an http(s) URL")]
    InvalidLink(String),
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Form for adding a job by hand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualJobForm {
    pub title: String,
    pub company: String,
    pub link: String,
    pub description: String,
    submitting: BusyFlag,
}

impl ManualJobForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.company.is_empty()
            && self.link.is_empty()
            && self.description.is_empty()
    }

    /// Check every field; all four are required and the link must be a URL
    pub fn validate(&self) -> Result<NewJob, FormError> {
        require(&self.company, "company")?;
        require(&self.title, "title")?;
        require(&self.link, "link")?;
        require(&self.description, "description")?;

        let link = self.link.trim();
        match Url::parse(link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(FormError::InvalidLink(link.to_string())),
        }

        Ok(NewJob {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            link: link.to_string(),
            description: self.description.clone(),
            source: MANUAL_ENTRY_SOURCE.to_string(),
        })
    }

    /// Post the job; on success clear the form and call `on_success` once
    ///
    /// On failure the fields are kept so the user can retry.
    pub async fn submit<F>(&mut self, backend: &dyn Backend, on_success: F) -> FlowResult<Job>
    where
        F: FnOnce(&Job),
    {
        let _busy = self.submitting.acquire()?;
        let new_job = self.validate()?;
        let job = backend.create_job(&new_job).await?;
        self.title.clear();
        self.company.clear();
        self.link.clear();
        self.description.clear();
        tracing::info!(job_id = job.id, title = %job.title, "Manual job added");
        on_success(&job);
        Ok(job)
    }
}

/// Form for uploading a resume as a file or pasted source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeForm {
    pub name: String,
    pub description: String,
    pub latex_code: String,
    pub file: Option<ResumeFile>,
    submitting: BusyFlag,
}

impl ResumeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    pub fn validate(&self) -> Result<NewResume, FormError> {
        require(&self.name, "name")?;
        Ok(NewResume {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            latex_code: self.latex_code.clone(),
            file: self.file.clone(),
        })
    }

    pub async fn submit<F>(&mut self, backend: &dyn Backend, on_success: F) -> FlowResult<Resume>
    where
        F: FnOnce(&Resume),
    {
        let _busy = self.submitting.acquire()?;
        let new_resume = self.validate()?;
        let resume = backend.create_resume(&new_resume).await?;
        self.name.clear();
        self.description.clear();
        self.latex_code.clear();
        self.file = None;
        tracing::info!(resume_id = resume.id, name = %resume.name, "Resume uploaded");
        on_success(&resume);
        Ok(resume)
    }
}
