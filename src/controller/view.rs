//! Navigation State
//!
//! Tabs and the dashboard's sub-view state machine. Sub-views form a star
//! around `List`: every other view is entered from `List` and leaves only
//! back to `List`. Each non-list view carries the data it needs, so a
//! generator without a job cannot be represented.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Job;
use crate::store::StoreName;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Jobs,
    Resumes,
    Apps,
    Analytics,
    Automation,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Jobs,
            Tab::Resumes,
            Tab::Apps,
            Tab::Analytics,
            Tab::Automation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Jobs => "jobs",
            Tab::Resumes => "resumes",
            Tab::Apps => "apps",
            Tab::Analytics => "analytics",
            Tab::Automation => "automation",
        }
    }

    /// Store fetched when this tab becomes active
    ///
    /// Analytics is computed from applications. Automation is local only.
    pub fn store(&self) -> Option<StoreName> {
        match self {
            Tab::Jobs => Some(StoreName::Jobs),
            Tab::Resumes => Some(StoreName::Resumes),
            Tab::Apps | Tab::Analytics => Some(StoreName::Applications),
            Tab::Automation => None,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::all()
            .iter()
            .copied()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab: {}", s))
    }
}

/// Discriminant of [`ViewState`], used in errors and logs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    List,
    Generate,
    Interview,
    ManualJob,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::List => write!(f, "list"),
            ViewKind::Generate => write!(f, "generate"),
            ViewKind::Interview => write!(f, "interview"),
            ViewKind::ManualJob => write!(f, "manual_job"),
        }
    }
}

/// Which sub-view is mounted
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    List,
    Generate { job: Job },
    Interview { job: Job },
    ManualJob,
}

impl ViewState {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewState::List => ViewKind::List,
            ViewState::Generate { .. } => ViewKind::Generate,
            ViewState::Interview { .. } => ViewKind::Interview,
            ViewState::ManualJob => ViewKind::ManualJob,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            ViewState::Generate { job } | ViewState::Interview { job } => Some(job),
            ViewState::List | ViewState::ManualJob => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ViewState::List)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("cannot go from {from} to {to}; return to the list first")]
    InvalidTransition { from: ViewKind, to: ViewKind },
}

/// Tab, sub-view and the last selected job
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    tab: Tab,
    view: ViewState,
    selected_job: Option<Job>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Last job handed to a generate or interview transition
    ///
    /// Survives `return_to_list` and is only replaced by the next selection.
    pub fn selected_job(&self) -> Option<&Job> {
        self.selected_job.as_ref()
    }

    /// Switch tab and drop back to the list view
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.view = ViewState::List;
    }

    pub fn begin_generate(&mut self, job: Job) -> Result<(), NavigationError> {
        self.require_list(ViewKind::Generate)?;
        self.selected_job = Some(job.clone());
        self.view = ViewState::Generate { job };
        Ok(())
    }

    pub fn begin_interview(&mut self, job: Job) -> Result<(), NavigationError> {
        self.require_list(ViewKind::Interview)?;
        self.selected_job = Some(job.clone());
        self.view = ViewState::Interview { job };
        Ok(())
    }

    pub fn begin_manual_job(&mut self) -> Result<(), NavigationError> {
        self.require_list(ViewKind::ManualJob)?;
        self.view = ViewState::ManualJob;
        Ok(())
    }

    pub fn return_to_list(&mut self) {
        self.view = ViewState::List;
    }

    fn require_list(&self, to: ViewKind) -> Result<(), NavigationError> {
        if self.view.is_list() {
            Ok(())
        } else {
            Err(NavigationError::InvalidTransition {
                from: self.view.kind(),
                to,
            })
        }
    }
}
