//! Interview Coach
//!
//! Mock-interview chat scoped to one job. The backend owns the transcript:
//! each successful turn replaces the local copy wholesale, so the two can
//! only differ while a request is in flight or after a failed turn.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::Backend;
use crate::busy::BusyFlag;
use crate::error::{FlowError, FlowResult};
use crate::models::{AnswerAnalysis, Job, Role, SessionId, Transcript, Turn};

/// Placeholder assistant turn shown after a failed round trip
pub const CONNECTION_ERROR_TURN: &str = "[Error connection]";

/// Question used when analysing an answer that opens the transcript
pub const OPENING_QUESTION: &str = "Introduction";

/// What to do with the optimistic user turn when a chat round trip fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailedTurnPolicy {
    /// Keep the user turn and append a connection-error marker
    #[default]
    Keep,
    /// Remove the user turn so the transcript matches the backend again
    Retract,
}

impl std::str::FromStr for FailedTurnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(FailedTurnPolicy::Keep),
            "retract" => Ok(FailedTurnPolicy::Retract),
            other => Err(format!("unknown failed-turn policy: {}", other)),
        }
    }
}

/// Optimistic user turn awaiting the backend's transcript
///
/// Unless settled with the backend's copy, dropping it applies the
/// failed-turn policy. That covers both an error and a dropped request.
struct PendingTurn<'a> {
    transcript: &'a mut Transcript,
    policy: FailedTurnPolicy,
    settled: bool,
}

impl<'a> PendingTurn<'a> {
    fn push(transcript: &'a mut Transcript, message: &str, policy: FailedTurnPolicy) -> Self {
        transcript.push(Turn::user(message));
        Self {
            transcript,
            policy,
            settled: false,
        }
    }

    fn settle(mut self, transcript: Transcript) {
        *self.transcript = transcript;
        self.settled = true;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        match self.policy {
            FailedTurnPolicy::Keep => self.transcript.push(Turn::assistant(CONNECTION_ERROR_TURN)),
            FailedTurnPolicy::Retract => {
                self.transcript.pop();
            }
        }
    }
}

pub struct InterviewCoach {
    backend: Arc<dyn Backend>,
    job: Job,
    session_id: Option<SessionId>,
    transcript: Transcript,
    policy: FailedTurnPolicy,
    loading: BusyFlag,
}

impl InterviewCoach {
    pub fn new(backend: Arc<dyn Backend>, job: Job) -> Self {
        Self {
            backend,
            job,
            session_id: None,
            transcript: Transcript::default(),
            policy: FailedTurnPolicy::default(),
            loading: BusyFlag::new(),
        }
    }

    /// Builder method: set the failed-turn policy
    pub fn with_policy(mut self, policy: FailedTurnPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Open a session for the job and load the greeting
    pub async fn start(&mut self) -> FlowResult<&Transcript> {
        let _busy = self.loading.acquire()?;
        let started = self.backend.start_interview(self.job.id).await?;
        tracing::info!(job_id = self.job.id, session_id = started.session_id, "Interview started");
        self.session_id = Some(started.session_id);
        self.transcript = started.messages;
        Ok(&self.transcript)
    }

    /// Send one answer and adopt the backend's transcript
    pub async fn send(&mut self, message: &str) -> FlowResult<&Transcript> {
        if message.trim().is_empty() {
            return Err(FlowError::precondition("Message is empty"));
        }
        let session_id = self
            .session_id
            .ok_or_else(|| FlowError::precondition("Interview has not started"))?;
        let _busy = self.loading.acquire()?;

        let pending = PendingTurn::push(&mut self.transcript, message, self.policy);
        match self.backend.interview_chat(session_id, message).await {
            Ok(transcript) => {
                pending.settle(transcript);
                Ok(&self.transcript)
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, policy = ?self.policy, "Interview turn failed");
                drop(pending);
                Err(e.into())
            }
        }
    }

    /// Ask the backend to grade the user turn at `index`
    ///
    /// The question is the turn before it, or [`OPENING_QUESTION`] for the
    /// first turn.
    pub async fn analyze(&mut self, index: usize) -> FlowResult<AnswerAnalysis> {
        let session_id = self
            .session_id
            .ok_or_else(|| FlowError::precondition("Interview has not started"))?;
        let answer = match self.transcript.get(index) {
            Some(turn) if turn.role == Role::User => turn.content.clone(),
            Some(_) => return Err(FlowError::precondition("Only your own answers can be analysed")),
            None => return Err(FlowError::precondition(format!("No message at position {}", index))),
        };
        let question = index
            .checked_sub(1)
            .and_then(|prev| self.transcript.get(prev))
            .map(|turn| turn.content.clone())
            .unwrap_or_else(|| OPENING_QUESTION.to_string());

        let _busy = self.loading.acquire()?;
        Ok(self.backend.analyze_answer(session_id, &question, &answer).await?)
    }
}
