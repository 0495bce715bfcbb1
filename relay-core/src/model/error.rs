use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Typed failure returned in place of a reply payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SignalError {
    /// The request arrived out of order (e.g. produce before connect).
    #[error("precondition violated: {detail}")]
    PreconditionViolation { detail: String },

    /// The router cannot route the producer to the given RTP capabilities.
    #[error("cannot consume: {detail}")]
    CannotConsume { detail: String },

    /// The media engine rejected the call.
    #[error("media engine error: {message}")]
    Engine { message: String },

    /// The coordinator is no longer running.
    #[error("signaling coordinator unavailable")]
    Unavailable,
}

impl SignalError {
    pub fn precondition(detail: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            detail: detail.into(),
        }
    }

    pub fn engine(message: impl ToString) -> Self {
        Self::Engine {
            message: message.to_string(),
        }
    }
}
