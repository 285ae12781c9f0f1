//! Pipeline Analytics
//!
//! Summary counts derived from the applications store.

use serde::Serialize;

use crate::models::{Application, ApplicationStatus};

pub const DEFAULT_RECENT: usize = 4;

/// One labelled value for a chart
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChartPoint {
    pub name: &'static str,
    pub value: usize,
}

impl ChartPoint {
    fn new(name: &'static str, value: usize) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FunnelStats {
    pub total: usize,
    pub drafts: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl FunnelStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut stats = FunnelStats {
            total: applications.len(),
            ..Default::default()
        };
        for app in applications {
            match app.status {
                ApplicationStatus::Draft => stats.drafts += 1,
                ApplicationStatus::Sent => stats.applied += 1,
                ApplicationStatus::Interview => stats.interview += 1,
                ApplicationStatus::Offer => stats.offer += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }

    /// Applied, Interview, Offer bars
    pub fn funnel(&self) -> Vec<ChartPoint> {
        vec![
            ChartPoint::new("Applied", self.applied),
            ChartPoint::new("Interview", self.interview),
            ChartPoint::new("Offer", self.offer),
        ]
    }

    /// Sent / Rejected / Draft split
    ///
    /// "Draft" here is everything not currently in the sent column, so
    /// interview, offer and rejected applications are counted in it too.
    pub fn distribution(&self) -> Vec<ChartPoint> {
        vec![
            ChartPoint::new("Sent", self.applied),
            ChartPoint::new("Rejected", self.rejected),
            ChartPoint::new("Draft", self.total - self.applied),
        ]
    }
}

/// First `n` applications in display order
pub fn recent(applications: &[Application], n: usize) -> &[Application] {
    &applications[..n.min(applications.len())]
}
