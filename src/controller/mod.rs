//! View Controller
//!
//! Navigation state machine, notification queue, and the dashboard that
//! ties them to the entity stores.

pub mod dashboard;
pub mod notifications;
pub mod view;

pub use dashboard::Dashboard;
pub use notifications::{Level, Notification, Notifier};
pub use view::{Navigation, NavigationError, Tab, ViewKind, ViewState};
