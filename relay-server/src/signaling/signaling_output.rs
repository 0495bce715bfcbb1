use async_trait::async_trait;
use relay_core::{PeerId, ServerMessage};

/// Outbound side of the signaling channels, as seen by the coordinator.
///
/// Delivery is fire-and-forget: implementations log failures and never block
/// on the client.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Add a connected client to the broadcast set.
    ///
    /// Only the coordinator calls this, so joining is ordered against every
    /// broadcast it makes.
    async fn join(&self, peer_id: PeerId);

    /// Send a message to one connected client.
    async fn send_message(&self, peer_id: PeerId, msg: ServerMessage);

    /// Send a message to every joined client except `excluded`.
    async fn broadcast_except(&self, excluded: PeerId, msg: ServerMessage);
}
