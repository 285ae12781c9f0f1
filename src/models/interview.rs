//! Interview transcripts
//!
//! The backend stores a session's turns as a JSON-encoded string and may hand
//! them back either still encoded or as a native array. Both forms are
//! normalised here, at the boundary, into one [`Transcript`] type so nothing
//! downstream ever branches on the wire shape.

use serde::{Deserialize, Serialize};

use super::SessionId;

/// Who authored a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

/// One exchanged message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Wire forms accepted for a transcript
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTranscript {
    Turns(Vec<Turn>),
    Encoded(String),
}

impl TryFrom<WireTranscript> for Transcript {
    type Error = String;

    fn try_from(wire: WireTranscript) -> Result<Self, Self::Error> {
        match wire {
            WireTranscript::Turns(turns) => Ok(Transcript { turns }),
            WireTranscript::Encoded(text) => serde_json::from_str::<Vec<Turn>>(&text)
                .map(|turns| Transcript { turns })
                .map_err(|e| format!("invalid encoded transcript: {}", e)),
        }
    }
}

/// Ordered sequence of interview turns
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "WireTranscript", into = "Vec<Turn>")]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub(crate) fn pop(&mut self) -> Option<Turn> {
        self.turns.pop()
    }
}

impl From<Transcript> for Vec<Turn> {
    fn from(transcript: Transcript) -> Self {
        transcript.turns
    }
}

/// Response of `POST /interview/{job_id}/start/`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InterviewStart {
    pub session_id: SessionId,
    #[serde(default)]
    pub messages: Transcript,
}
