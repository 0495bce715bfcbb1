use async_trait::async_trait;
use relay_core::{PeerId, ServerMessage};
use relay_server::SignalingOutput;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Mock SignalingOutput that captures every pushed message.
///
/// Broadcasts go to the peers the coordinator has joined, standing in for
/// the live-channel registry of the real service.
#[derive(Clone)]
pub struct MockSignalingOutput {
    tx: mpsc::UnboundedSender<(PeerId, ServerMessage)>,
    sent: Arc<Mutex<Vec<(PeerId, ServerMessage)>>>,
    peers: Arc<Mutex<Vec<PeerId>>>,
}

impl MockSignalingOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(PeerId, ServerMessage)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            sent: Arc::new(Mutex::new(Vec::new())),
            peers: Arc::new(Mutex::new(Vec::new())),
        };
        (signaling, rx)
    }

    pub async fn unregister(&self, peer_id: &PeerId) {
        self.peers.lock().await.retain(|p| p != peer_id);
    }

    pub async fn messages_for(&self, peer_id: &PeerId) -> Vec<ServerMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == peer_id)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub async fn new_producer_count(&self, peer_id: &PeerId) -> usize {
        self.messages_for(peer_id)
            .await
            .iter()
            .filter(|msg| matches!(msg, ServerMessage::NewProducer))
            .count()
    }

    async fn push(&self, peer_id: PeerId, msg: ServerMessage) {
        self.sent.lock().await.push((peer_id, msg.clone()));
        let _ = self.tx.send((peer_id, msg));
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn join(&self, peer_id: PeerId) {
        tracing::debug!("[MockSignaling] join {}", peer_id);
        let mut peers = self.peers.lock().await;
        if !peers.contains(&peer_id) {
            peers.push(peer_id);
        }
    }

    async fn send_message(&self, peer_id: PeerId, msg: ServerMessage) {
        tracing::debug!("[MockSignaling] send_message to {}", peer_id);
        self.push(peer_id, msg).await;
    }

    async fn broadcast_except(&self, excluded: PeerId, msg: ServerMessage) {
        tracing::debug!("[MockSignaling] broadcast_except {}", excluded);

        let targets: Vec<PeerId> = self
            .peers
            .lock()
            .await
            .iter()
            .copied()
            .filter(|p| *p != excluded)
            .collect();

        for peer_id in targets {
            self.push(peer_id, msg.clone()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_skips_excluded_peer() {
        let (signaling, mut rx) = MockSignalingOutput::new();
        let a = PeerId::new();
        let b = PeerId::new();
        signaling.join(a).await;
        signaling.join(b).await;

        signaling.broadcast_except(a, ServerMessage::NewProducer).await;

        let (to, msg) = rx.recv().await.unwrap();
        assert_eq!(to, b);
        assert_eq!(msg, ServerMessage::NewProducer);
        assert_eq!(signaling.new_producer_count(&a).await, 0);
    }
}
