//! Application Pipeline
//!
//! Kanban grouping of applications by status and the drop events the board
//! emits. The client allows any column-to-column move; the resulting status
//! is written unconditionally and reconciled by a full refetch.

use serde::{Deserialize, Serialize};

use crate::models::{Application, ApplicationStatus, TrackingId};

/// Card position on the board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub status: ApplicationStatus,
    pub index: usize,
}

impl Slot {
    pub fn new(status: ApplicationStatus, index: usize) -> Self {
        Self { status, index }
    }
}

/// A finished drag gesture
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DropEvent {
    pub tracking_id: TrackingId,
    pub source: Slot,
    /// `None` when the card was released outside any column
    pub destination: Option<Slot>,
}

impl DropEvent {
    /// Status to write, if the drop changes the card's column
    ///
    /// Releases outside the board and reorders within a column need no
    /// backend write.
    pub fn target_status(&self) -> Option<ApplicationStatus> {
        match self.destination {
            Some(dest) if dest.status != self.source.status => Some(dest.status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub status: ApplicationStatus,
    pub title: &'static str,
    pub cards: Vec<Application>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// All five columns in pipeline order
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Group applications by status, keeping store order inside each column
    pub fn from_applications(applications: &[Application]) -> Self {
        let columns = ApplicationStatus::all()
            .iter()
            .map(|&status| Column {
                status,
                title: status.column_title(),
                cards: applications
                    .iter()
                    .filter(|app| app.status == status)
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: ApplicationStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Current slot of a card, as a drop source
    pub fn locate(&self, tracking_id: TrackingId) -> Option<Slot> {
        self.columns.iter().find_map(|column| {
            column
                .cards
                .iter()
                .position(|app| app.tracking_id == tracking_id)
                .map(|index| Slot::new(column.status, index))
        })
    }

    /// Build the drop event for moving a card to the end of another column
    pub fn drop_into(&self, tracking_id: TrackingId, status: ApplicationStatus) -> Option<DropEvent> {
        let source = self.locate(tracking_id)?;
        let index = self.column(status).map(Column::len).unwrap_or(0);
        Some(DropEvent {
            tracking_id,
            source,
            destination: Some(Slot::new(status, index)),
        })
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }
}
