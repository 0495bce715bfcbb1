use crate::coordinator::{CoordinatorCommand, SignalResult};
use crate::error::CoordinatorError;
use crate::session::SessionSnapshot;
use relay_core::{PeerId, SignalError, SignalRequest};
use tokio::sync::{mpsc, oneshot};

/// Capacity of the coordinator's command queue.
pub const COMMAND_BUFFER: usize = 256;

/// Create the command channel shared by the signaling layer and the coordinator.
pub fn coordinator_channel(
    buffer: usize,
) -> (CoordinatorHandle, mpsc::Receiver<CoordinatorCommand>) {
    let (tx, rx) = mpsc::channel(buffer);
    (CoordinatorHandle { tx }, rx)
}

/// Cloneable sender side of the coordinator.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    async fn send(&self, cmd: CoordinatorCommand) -> Result<(), CoordinatorError> {
        self.tx.send(cmd).await.map_err(|_| CoordinatorError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn connected(&self, peer_id: PeerId) -> Result<(), CoordinatorError> {
        self.send(CoordinatorCommand::Connected { peer_id }).await
    }

    pub async fn disconnected(&self, peer_id: PeerId) -> Result<(), CoordinatorError> {
        self.send(CoordinatorCommand::Disconnected { peer_id }).await
    }

    /// Queue a request and return the pending reply.
    ///
    /// Requests are handled in the order they were submitted.
    pub async fn submit(
        &self,
        peer_id: PeerId,
        request: SignalRequest,
    ) -> Result<oneshot::Receiver<SignalResult>, CoordinatorError> {
        let (reply, pending) = oneshot::channel();
        self.send(CoordinatorCommand::Request {
            peer_id,
            request,
            reply,
        })
        .await?;
        Ok(pending)
    }

    /// Submit a request and wait for its result.
    pub async fn request(&self, peer_id: PeerId, request: SignalRequest) -> SignalResult {
        let pending = self.submit(peer_id, request).await?;
        pending.await.unwrap_or(Err(SignalError::Unavailable))
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, CoordinatorError> {
        let (reply, pending) = oneshot::channel();
        self.send(CoordinatorCommand::Snapshot { reply }).await?;
        pending.await.map_err(|_| CoordinatorError::Closed)
    }
}
