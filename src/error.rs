//! Errors for user-initiated flows

use thiserror::Error;

use crate::api::ApiError;
use crate::controller::NavigationError;
use crate::forms::FormError;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("A request is already in progress")]
    Busy,

    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Form(#[from] FormError),
}

impl FlowError {
    pub fn precondition(message: impl Into<String>) -> Self {
        FlowError::Precondition(message.into())
    }

    /// Text suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
