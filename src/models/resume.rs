//! Base resumes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ResumeId;

/// A stored resume as returned by `GET /api/resumes/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resume {
    pub id: ResumeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// URL of the uploaded file, if one was provided
    #[serde(default)]
    pub file: Option<String>,
    /// Pasted or extracted source text
    #[serde(default)]
    pub latex_code: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl Resume {
    pub fn new(id: ResumeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            file: None,
            latex_code: None,
            keywords: None,
            uploaded_at: None,
        }
    }
}

/// File attached to a resume upload
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeFile {
    /// Read from disk at send time
    Path(PathBuf),
    /// Already in memory
    Bytes { file_name: String, data: Vec<u8> },
}

/// Multipart body of `POST /api/resumes/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewResume {
    pub name: String,
    pub description: String,
    pub latex_code: String,
    pub file: Option<ResumeFile>,
}
