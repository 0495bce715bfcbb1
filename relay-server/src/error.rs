use relay_core::SignalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("signaling coordinator has shut down")]
    Closed,
}

impl From<CoordinatorError> for SignalError {
    fn from(_: CoordinatorError) -> Self {
        SignalError::Unavailable
    }
}
