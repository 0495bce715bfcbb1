pub mod transport_tests;
pub mod websocket_tests;

use relay_core::{
    ConsumerParams, MediaKind, PeerId, ProducerId, SignalReply, SignalRequest, TransportId,
};
use relay_server::engine::TransportOptions;
use relay_server::{Coordinator, CoordinatorHandle, SignalingService, coordinator_channel, http};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Level;

use crate::utils::{
    MockEngine, MockSignalingOutput, dtls_parameters, opus_rtp_parameters, vp8_rtp_parameters,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestCoordinator {
    pub handle: CoordinatorHandle,
    pub engine: MockEngine,
    pub signaling: MockSignalingOutput,
}

pub fn create_test_coordinator() -> TestCoordinator {
    create_test_coordinator_with(TransportOptions::default())
}

pub fn create_test_coordinator_with(options: TransportOptions) -> TestCoordinator {
    let (handle, command_rx) = coordinator_channel(100);
    let (signaling, _signal_rx) = MockSignalingOutput::new();
    let engine = MockEngine::new();

    let coordinator = Coordinator::new(
        engine.router(),
        options,
        command_rx,
        Arc::new(signaling.clone()),
    );

    tokio::spawn(async move {
        coordinator.run().await;
    });

    TestCoordinator {
        handle,
        engine,
        signaling,
    }
}

impl TestCoordinator {
    /// Announce a new client the way the WebSocket handler does.
    pub async fn connect_peer(&self) -> PeerId {
        let peer_id = PeerId::new();
        self.handle
            .connected(peer_id)
            .await
            .expect("coordinator should be running");
        peer_id
    }

    pub async fn disconnect_peer(&self, peer_id: PeerId) {
        self.signaling.unregister(&peer_id).await;
        self.handle
            .disconnected(peer_id)
            .await
            .expect("coordinator should be running");
    }

    /// Wait until every command queued so far has been handled.
    pub async fn settle(&self) {
        self.handle
            .snapshot()
            .await
            .expect("coordinator should be running");
    }

    pub async fn create_transport(&self, peer_id: PeerId, request: SignalRequest) -> TransportId {
        match self.handle.request(peer_id, request).await {
            Ok(SignalReply::Transport(params)) => params.id,
            other => panic!("expected transport params, got {:?}", other),
        }
    }

    pub async fn connect_producer_transport(&self, peer_id: PeerId) -> TransportId {
        let id = self
            .create_transport(peer_id, SignalRequest::CreateProducerTransport)
            .await;
        let reply = self
            .handle
            .request(
                peer_id,
                SignalRequest::ConnectProducerTransport {
                    dtls_parameters: dtls_parameters(),
                },
            )
            .await;
        assert_eq!(reply, Ok(SignalReply::Ack));
        id
    }

    pub async fn connect_consumer_transport(&self, peer_id: PeerId) -> TransportId {
        let id = self
            .create_transport(peer_id, SignalRequest::CreateConsumerTransport)
            .await;
        let reply = self
            .handle
            .request(
                peer_id,
                SignalRequest::ConnectConsumerTransport {
                    dtls_parameters: dtls_parameters(),
                },
            )
            .await;
        assert_eq!(reply, Ok(SignalReply::Ack));
        id
    }

    pub async fn produce(&self, peer_id: PeerId, kind: MediaKind) -> ProducerId {
        let rtp_parameters = match kind {
            MediaKind::Audio => opus_rtp_parameters(),
            MediaKind::Video => vp8_rtp_parameters(),
        };
        match self
            .handle
            .request(
                peer_id,
                SignalRequest::Produce {
                    kind,
                    rtp_parameters,
                },
            )
            .await
        {
            Ok(SignalReply::Produced(params)) => params.id,
            other => panic!("expected produced params, got {:?}", other),
        }
    }

    /// Full publish flow: transport, connect, produce.
    pub async fn publish(&self, peer_id: PeerId, kind: MediaKind) -> ProducerId {
        self.connect_producer_transport(peer_id).await;
        self.produce(peer_id, kind).await
    }

    pub async fn consume(&self, peer_id: PeerId, rtp_capabilities: Value) -> ConsumerParams {
        match self
            .handle
            .request(peer_id, SignalRequest::Consume { rtp_capabilities })
            .await
        {
            Ok(SignalReply::Consumed(params)) => params,
            other => panic!("expected consumer params, got {:?}", other),
        }
    }
}

/// Run a coordinator behind the real signaling service.
pub fn start_signaling(engine: &MockEngine) -> SignalingService {
    let (handle, command_rx) = coordinator_channel(100);
    let signaling = SignalingService::new(handle);
    let coordinator = Coordinator::new(
        engine.router(),
        TransportOptions::default(),
        command_rx,
        Arc::new(signaling.clone()),
    );
    tokio::spawn(coordinator.run());
    signaling
}

/// Serve the full HTTP stack on an ephemeral port, backed by `engine`.
pub async fn start_test_server(engine: &MockEngine, static_dir: &Path) -> SocketAddr {
    let signaling = start_signaling(engine);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    let app = http::router(signaling, static_dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    addr
}
