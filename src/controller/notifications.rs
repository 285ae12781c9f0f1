//! Notifications
//!
//! Non-blocking toast queue. Failures are pushed here instead of
//! interrupting the user; the front end drains and renders them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => write!(f, "info"),
            Level::Success => write!(f, "success"),
            Level::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded notification queue; the oldest entry is dropped when full
pub struct Notifier {
    queue: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, level: Level, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;

        let mut queue = self.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
        id
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(Level::Error, message)
    }

    /// Copy of the pending notifications, oldest first
    pub fn pending(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    /// Take every pending notification
    pub fn drain(&self) -> Vec<Notification> {
        self.lock().drain(..).collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // A panic while holding the lock cannot leave the queue half-written
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
