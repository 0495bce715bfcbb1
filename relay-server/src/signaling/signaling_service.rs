use crate::coordinator::CoordinatorHandle;
use crate::error::CoordinatorError;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::{DashMap, DashSet};
use relay_core::{PeerId, RequestId, ServerMessage, SignalError, SignalRequest};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
    /// Peers the coordinator has admitted; broadcasts only reach these.
    joined: DashSet<PeerId>,
}

/// Registry of live signaling channels; bridges them to the coordinator.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    coordinator: CoordinatorHandle,
}

impl SignalingService {
    pub fn new(coordinator: CoordinatorHandle) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                joined: DashSet::new(),
            }),
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.joined.remove(peer_id);
        self.inner.peers.remove(peer_id);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    fn encode(msg: &ServerMessage) -> Option<Message> {
        match serde_json::to_string(msg) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                error!("Failed to serialize signal message: {}", e);
                None
            }
        }
    }

    fn deliver(&self, peer_id: &PeerId, msg: Message) {
        if let Some(peer) = self.inner.peers.get(peer_id) {
            if let Err(e) = peer.send(msg) {
                error!("Failed to send WS message to {}: {:?}", peer_id, e);
            }
        } else {
            warn!("Attempted to send signal to disconnected client {}", peer_id);
        }
    }

    pub fn send_signal(&self, peer_id: PeerId, msg: &ServerMessage) {
        if let Some(encoded) = Self::encode(msg) {
            self.deliver(&peer_id, encoded);
        }
    }

    /// Hand a request to the coordinator and answer it once the result arrives.
    ///
    /// Returns as soon as the request is queued so the caller can keep
    /// reading; the response is written from a separate task.
    pub async fn dispatch(
        &self,
        peer_id: PeerId,
        id: RequestId,
        request: SignalRequest,
    ) -> Result<(), CoordinatorError> {
        let pending = self.coordinator.submit(peer_id, request).await?;

        let service = self.clone();
        tokio::spawn(async move {
            let result = pending.await.unwrap_or(Err(SignalError::Unavailable));
            debug!("Answering {} for {}", id, peer_id);
            service.send_signal(
                peer_id,
                &ServerMessage::Response {
                    id,
                    result: result.into(),
                },
            );
        });

        Ok(())
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn join(&self, peer_id: PeerId) {
        if self.inner.peers.contains_key(&peer_id) {
            self.inner.joined.insert(peer_id);
        } else {
            debug!("{} left before it could join", peer_id);
        }
    }

    async fn send_message(&self, peer_id: PeerId, msg: ServerMessage) {
        self.send_signal(peer_id, &msg);
    }

    async fn broadcast_except(&self, excluded: PeerId, msg: ServerMessage) {
        let Some(encoded) = Self::encode(&msg) else {
            return;
        };

        // Collect first so no map guard is held while sending.
        let targets: Vec<PeerId> = self
            .inner
            .joined
            .iter()
            .map(|entry| *entry.key())
            .filter(|peer_id| *peer_id != excluded)
            .collect();

        for peer_id in targets {
            self.deliver(&peer_id, encoded.clone());
        }
    }
}
