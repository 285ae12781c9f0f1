//! Automation
//!
//! Locally persisted bulk-apply preferences and the scheduler that acts
//! on them.

pub mod scheduler;
pub mod settings;

pub use scheduler::{is_due, AutomationScheduler, RunStatus};
pub use settings::{AutomationSettings, SettingsError, SettingsStore};
