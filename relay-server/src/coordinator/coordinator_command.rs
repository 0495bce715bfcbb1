use crate::session::SessionSnapshot;
use relay_core::{PeerId, SignalError, SignalReply, SignalRequest};
use tokio::sync::oneshot;

pub type SignalResult = Result<SignalReply, SignalError>;

/// Commands the signaling layer feeds into the coordinator.
#[derive(Debug)]
pub enum CoordinatorCommand {
    /// A signaling channel opened.
    Connected { peer_id: PeerId },

    /// A client request; exactly one result is sent back on `reply`.
    Request {
        peer_id: PeerId,
        request: SignalRequest,
        reply: oneshot::Sender<SignalResult>,
    },

    /// A signaling channel closed.
    Disconnected { peer_id: PeerId },

    /// Read the current session without touching it.
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}
