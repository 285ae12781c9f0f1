//! Automation Scheduler
//!
//! Runs the bulk-apply operation on demand or once per day at the
//! configured local time while the process stays up.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::AutomationSettings;
use crate::api::Backend;
use crate::error::{FlowError, FlowResult};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "idle"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Success => write!(f, "success"),
            RunStatus::Error => write!(f, "error"),
        }
    }
}

/// Whether a scheduled run is owed at `now`
///
/// Due when active, at or past the daily time, and not yet run today. An
/// unparseable time never fires.
pub fn is_due(settings: &AutomationSettings, last_run: Option<NaiveDate>, now: NaiveDateTime) -> bool {
    if !settings.is_active {
        return false;
    }
    let Ok(run_time) = settings.run_time() else {
        return false;
    };
    now.time() >= run_time && last_run != Some(now.date())
}

pub struct AutomationScheduler {
    backend: Arc<dyn Backend>,
    settings: Arc<RwLock<AutomationSettings>>,
    status: Arc<RwLock<RunStatus>>,
    last_message: Arc<RwLock<Option<String>>>,
    last_run: Arc<RwLock<Option<NaiveDate>>>,
    running: Arc<RwLock<bool>>,
    tick: Duration,
}

impl AutomationScheduler {
    pub fn new(backend: Arc<dyn Backend>, settings: AutomationSettings) -> Self {
        Self {
            backend,
            settings: Arc::new(RwLock::new(settings)),
            status: Arc::new(RwLock::new(RunStatus::Idle)),
            last_message: Arc::new(RwLock::new(None)),
            last_run: Arc::new(RwLock::new(None)),
            running: Arc::new(RwLock::new(false)),
            tick: Duration::from_secs(30),
        }
    }

    /// Builder method: how often the schedule is checked
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub async fn settings(&self) -> AutomationSettings {
        self.settings.read().await.clone()
    }

    pub async fn update_settings(&self, settings: AutomationSettings) {
        *self.settings.write().await = settings;
    }

    pub async fn status(&self) -> RunStatus {
        *self.status.read().await
    }

    /// Backend message from the last finished run
    pub async fn last_message(&self) -> Option<String> {
        self.last_message.read().await.clone()
    }

    pub async fn last_run(&self) -> Option<NaiveDate> {
        *self.last_run.read().await
    }

    /// Trigger a bulk-apply run now, bypassing the schedule
    ///
    /// The request runs on its own task and records its outcome there, so
    /// dropping this future leaves the run going and the status settles
    /// when it finishes.
    pub async fn run_now(&self) -> FlowResult<String> {
        {
            let mut status = self.status.write().await;
            if *status == RunStatus::Running {
                return Err(FlowError::Busy);
            }
            *status = RunStatus::Running;
        }

        let request = self.settings.read().await.to_request();
        tracing::info!(limit = ?request.limit, auto_approve = ?request.auto_approve, "Running automation");

        let backend = Arc::clone(&self.backend);
        let status = Arc::clone(&self.status);
        let last_message = Arc::clone(&self.last_message);
        let run = tokio::spawn(async move {
            match backend.apply_all(&request).await {
                Ok(message) => {
                    *last_message.write().await = Some(message.clone());
                    *status.write().await = RunStatus::Success;
                    tracing::info!(%message, "Automation run finished");
                    Ok(message)
                }
                Err(e) => {
                    *last_message.write().await = Some(e.user_message());
                    *status.write().await = RunStatus::Error;
                    tracing::error!(error = %e, "Automation run failed");
                    Err(FlowError::from(e))
                }
            }
        });

        match run.await {
            Ok(result) => result,
            Err(e) => {
                *self.status.write().await = RunStatus::Error;
                tracing::error!(error = %e, "Automation run task failed");
                Err(FlowError::precondition(format!("Automation run aborted: {}", e)))
            }
        }
    }

    /// Run if a scheduled run is owed at `now`
    ///
    /// The day is marked as run before the request goes out, so a failed
    /// run is not retried until the next day. While another run is in
    /// flight the day stays unmarked and a later tick picks it up.
    pub async fn tick_at(&self, now: NaiveDateTime) -> Option<FlowResult<String>> {
        let settings = self.settings().await;
        {
            let mut last_run = self.last_run.write().await;
            if !is_due(&settings, *last_run, now) {
                return None;
            }
            if self.status().await == RunStatus::Running {
                tracing::debug!("Run in progress, deferring scheduled automation");
                return None;
            }
            *last_run = Some(now.date());
        }
        tracing::info!(daily_time = %settings.daily_time, "Scheduled automation due");
        Some(self.run_now().await)
    }

    /// Start the schedule loop
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            *scheduler.running.write().await = true;

            let mut interval = tokio::time::interval(scheduler.tick);

            loop {
                interval.tick().await;

                if !*scheduler.running.read().await {
                    break;
                }

                if let Some(Err(e)) = scheduler.tick_at(Local::now().naive_local()).await {
                    tracing::warn!(error = %e, "Scheduled automation run failed");
                }
            }
        })
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::FakeBackend;
    use chrono::NaiveTime;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    fn active() -> AutomationSettings {
        AutomationSettings {
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_is_due() {
        let settings = active();
        assert!(!is_due(&settings, None, at(2, 8, 59)));
        assert!(is_due(&settings, None, at(2, 9, 0)));
        assert!(is_due(&settings, None, at(2, 23, 0)));
        assert!(!is_due(&settings, Some(at(2, 0, 0).date()), at(2, 10, 0)));
        assert!(is_due(&settings, Some(at(2, 0, 0).date()), at(3, 9, 30)));

        let inactive = AutomationSettings::default();
        assert!(!is_due(&inactive, None, at(2, 10, 0)));
    }

    #[tokio::test]
    async fn test_run_now_sends_settings() {
        let backend = Arc::new(FakeBackend::new());
        let settings = AutomationSettings {
            max_apps: 3,
            auto_approve: true,
            ..Default::default()
        };
        let scheduler = AutomationScheduler::new(backend.clone(), settings);

        let message = scheduler.run_now().await.unwrap();
        assert!(message.contains("Processed"));
        assert_eq!(scheduler.status().await, RunStatus::Success);
        assert_eq!(
            backend.calls(),
            vec![r#"apply_all {"limit":3,"auto_approve":true,"resume_id":null}"#]
        );
    }

    #[tokio::test]
    async fn test_run_now_error_status() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("apply_all");
        let scheduler = AutomationScheduler::new(backend.clone(), active());

        assert!(scheduler.run_now().await.is_err());
        assert_eq!(scheduler.status().await, RunStatus::Error);
        assert_eq!(scheduler.last_message().await.as_deref(), Some("apply_all failed"));
    }

    #[tokio::test]
    async fn test_concurrent_run_rejected() {
        let backend = Arc::new(FakeBackend::new());
        let gate = backend.gate("apply_all");
        let scheduler = Arc::new(AutomationScheduler::new(backend.clone(), active()));

        let first = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run_now().await })
        };
        while backend.count("apply_all") == 0 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(scheduler.run_now().await, Err(FlowError::Busy)));
        gate.send(()).unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(backend.count("apply_all"), 1);
    }

    async fn wait_for_status(scheduler: &AutomationScheduler, status: RunStatus) {
        for _ in 0..200 {
            if scheduler.status().await == status {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("scheduler never reached {}", status);
    }

    #[tokio::test]
    async fn test_cancelled_caller_does_not_strand_status() {
        let backend = Arc::new(FakeBackend::new());
        let gate = backend.gate("apply_all");
        let scheduler = AutomationScheduler::new(backend.clone(), active());

        let timed_out = tokio::time::timeout(Duration::from_millis(20), scheduler.run_now()).await;
        assert!(timed_out.is_err());
        assert_eq!(scheduler.status().await, RunStatus::Running);

        gate.send(()).unwrap();
        wait_for_status(&scheduler, RunStatus::Success).await;
        assert!(scheduler.last_message().await.unwrap().contains("Processed"));

        scheduler.run_now().await.unwrap();
        assert_eq!(backend.count("apply_all"), 2);
    }

    #[tokio::test]
    async fn test_scheduled_run_deferred_while_manual_run_in_flight() {
        let backend = Arc::new(FakeBackend::new());
        let gate = backend.gate("apply_all");
        let scheduler = Arc::new(AutomationScheduler::new(backend.clone(), active()));

        let manual = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run_now().await })
        };
        wait_for_status(&scheduler, RunStatus::Running).await;

        assert!(scheduler.tick_at(at(5, 9, 30)).await.is_none());
        assert_eq!(scheduler.last_run().await, None);

        gate.send(()).unwrap();
        manual.await.unwrap().unwrap();

        assert!(matches!(scheduler.tick_at(at(5, 9, 31)).await, Some(Ok(_))));
        assert_eq!(scheduler.last_run().await, Some(at(5, 0, 0).date()));
        assert_eq!(backend.count("apply_all"), 2);
    }

    #[tokio::test]
    async fn test_fires_once_per_day() {
        let backend = Arc::new(FakeBackend::new());
        let scheduler = AutomationScheduler::new(backend.clone(), active());

        assert!(scheduler.tick_at(at(5, 8, 0)).await.is_none());
        assert!(scheduler.tick_at(at(5, 9, 1)).await.is_some());
        assert!(scheduler.tick_at(at(5, 9, 2)).await.is_none());
        assert!(scheduler.tick_at(at(6, 9, 0)).await.is_some());

        assert_eq!(backend.count("apply_all"), 2);
        assert_eq!(scheduler.last_run().await, Some(at(6, 0, 0).date()));
    }

    #[tokio::test]
    async fn test_failed_scheduled_run_waits_for_next_day() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("apply_all");
        let scheduler = AutomationScheduler::new(backend.clone(), active());

        assert!(matches!(scheduler.tick_at(at(5, 10, 0)).await, Some(Err(_))));
        assert!(scheduler.tick_at(at(5, 11, 0)).await.is_none());
        assert_eq!(backend.count("apply_all"), 1);
    }

    #[tokio::test]
    async fn test_stop_ends_loop() {
        let backend = Arc::new(FakeBackend::new());
        let scheduler = Arc::new(
            AutomationScheduler::new(backend.clone(), AutomationSettings::default())
                .with_tick(Duration::from_millis(5)),
        );

        let handle = scheduler.clone().start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop().await;
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        // Inactive settings never trigger a run
        assert_eq!(backend.count("apply_all"), 0);
    }
}
