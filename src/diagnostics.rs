//! Remote Diagnostics
//!
//! Fire-and-forget diagnostic events. Every event is written to the local
//! `tracing` subscriber and, when enabled, mirrored to the backend's
//! `/api/debug_log/` endpoint on a spawned task. Delivery failures are
//! logged locally and never reach the caller.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::Backend;

/// Default context tag for client-originated events
pub const DEFAULT_CONTEXT: &str = "FRONTEND";

/// Side-channel capability for diagnostic events
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, msg: &str, context: &str);

    /// Log with the sink's default context
    fn note(&self, msg: &str) {
        self.log(msg, DEFAULT_CONTEXT);
    }
}

/// Sink that only writes to the local subscriber
#[derive(Debug, Default, Clone)]
pub struct LocalSink;

impl DiagnosticSink for LocalSink {
    fn log(&self, msg: &str, context: &str) {
        tracing::info!(context, "{}", msg);
    }
}

/// Sink that mirrors events to the backend
pub struct RemoteLogger {
    backend: Arc<dyn Backend>,
    enabled: bool,
    default_context: String,
}

impl RemoteLogger {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            enabled: true,
            default_context: DEFAULT_CONTEXT.to_string(),
        }
    }

    /// Builder method: toggle remote delivery
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method: context used by [`DiagnosticSink::note`]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.default_context = context.into();
        self
    }

    /// Log locally and spawn remote delivery
    ///
    /// Returns the delivery task, or `None` when remote delivery is disabled
    /// or no runtime is available.
    pub fn emit(&self, msg: &str, context: &str) -> Option<JoinHandle<()>> {
        tracing::info!(context, "{}", msg);

        if !self.enabled {
            return None;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::debug!("No async runtime, skipping remote log delivery");
                return None;
            }
        };

        let backend = Arc::clone(&self.backend);
        let msg = msg.to_string();
        let context = context.to_string();
        Some(handle.spawn(async move {
            if let Err(e) = backend.debug_log(&msg, &context).await {
                tracing::warn!(error = %e, "Failed to send remote log");
            }
        }))
    }
}

impl DiagnosticSink for RemoteLogger {
    fn log(&self, msg: &str, context: &str) {
        let _ = self.emit(msg, context);
    }

    fn note(&self, msg: &str) {
        let _ = self.emit(msg, &self.default_context);
    }
}
