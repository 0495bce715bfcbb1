use relay_core::SignalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A client supplied descriptor could not be decoded.
    #[error("invalid {what}: {reason}")]
    InvalidParameters { what: &'static str, reason: String },

    /// The engine rejected a request.
    #[error("{0}")]
    Request(String),

    /// Worker or router could not be brought up.
    #[error("failed to start media engine: {0}")]
    Startup(String),
}

impl EngineError {
    pub fn invalid(what: &'static str, reason: impl ToString) -> Self {
        Self::InvalidParameters {
            what,
            reason: reason.to_string(),
        }
    }

    pub fn request(reason: impl ToString) -> Self {
        Self::Request(reason.to_string())
    }
}

impl From<EngineError> for SignalError {
    fn from(err: EngineError) -> Self {
        SignalError::engine(err)
    }
}
