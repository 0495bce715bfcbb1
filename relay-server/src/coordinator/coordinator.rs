use crate::coordinator::{CoordinatorCommand, SignalResult};
use crate::engine::{MediaRouter, PREFERRED_LAYERS, TransportOptions};
use crate::session::{SessionState, TransportSide};
use crate::signaling::SignalingOutput;
use relay_core::{
    ConsumerParams, ConsumerType, MediaKind, PeerId, ProducedParams, ServerMessage, SignalError,
    SignalReply, SignalRequest,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Owns the session and the router; turns signaling requests into engine calls.
///
/// Commands are handled one at a time, each to completion, so a request that
/// awaits the engine can never observe another request's half-applied state.
pub struct Coordinator {
    router: Arc<dyn MediaRouter>,
    transport_options: TransportOptions,
    session: SessionState,
    command_rx: mpsc::Receiver<CoordinatorCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl Coordinator {
    pub fn new(
        router: Arc<dyn MediaRouter>,
        transport_options: TransportOptions,
        command_rx: mpsc::Receiver<CoordinatorCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            router,
            transport_options,
            session: SessionState::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Coordinator loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Coordinator shutting down.");
    }

    async fn handle_command(&mut self, cmd: CoordinatorCommand) {
        match cmd {
            CoordinatorCommand::Connected { peer_id } => {
                info!("Client connected: {}", peer_id);

                // Joining and the producer check form one step, so a peer
                // hears about a producer exactly once.
                self.signaling.join(peer_id).await;
                if self.session.producer().is_some() {
                    self.signaling
                        .send_message(peer_id, ServerMessage::NewProducer)
                        .await;
                }
            }

            CoordinatorCommand::Request {
                peer_id,
                request,
                reply,
            } => {
                let name = request.name();
                debug!("{} from {}", name, peer_id);

                let result = self.handle_request(peer_id, request).await;
                if let Err(e) = &result {
                    warn!("{} from {} failed: {}", name, peer_id, e);
                }
                if reply.send(result).is_err() {
                    debug!("{} reply dropped, {} is gone", name, peer_id);
                }
            }

            CoordinatorCommand::Disconnected { peer_id } => {
                let released = self.session.release_owned_by(&peer_id);
                if released.is_empty() {
                    info!("Client disconnected: {}", peer_id);
                } else {
                    info!("Client disconnected: {}, released {:?}", peer_id, released);
                }
            }

            CoordinatorCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    async fn handle_request(&mut self, peer_id: PeerId, request: SignalRequest) -> SignalResult {
        match request {
            SignalRequest::GetRouterRtpCapabilities => {
                Ok(SignalReply::RtpCapabilities(self.router.rtp_capabilities()))
            }
            SignalRequest::CreateProducerTransport => {
                self.create_transport(peer_id, TransportSide::Producer).await
            }
            SignalRequest::CreateConsumerTransport => {
                self.create_transport(peer_id, TransportSide::Consumer).await
            }
            SignalRequest::ConnectProducerTransport { dtls_parameters } => {
                self.connect_transport(peer_id, TransportSide::Producer, dtls_parameters)
                    .await
            }
            SignalRequest::ConnectConsumerTransport { dtls_parameters } => {
                self.connect_transport(peer_id, TransportSide::Consumer, dtls_parameters)
                    .await
            }
            SignalRequest::Produce {
                kind,
                rtp_parameters,
            } => self.produce(peer_id, kind, rtp_parameters).await,
            SignalRequest::Consume { rtp_capabilities } => {
                self.create_consumer(peer_id, rtp_capabilities).await
            }
            SignalRequest::Resume => self.resume(peer_id).await,
        }
    }

    async fn create_transport(&mut self, peer_id: PeerId, side: TransportSide) -> SignalResult {
        let transport = self
            .router
            .create_webrtc_transport(&self.transport_options)
            .await?;

        if let Some(bitrate) = self.transport_options.max_incoming_bitrate {
            if let Err(e) = transport.set_max_incoming_bitrate(bitrate).await {
                debug!("Ignoring max incoming bitrate failure on {}: {}", transport.id(), e);
            }
        }

        let params = transport.params();
        info!("Created {} transport {} for {}", side, params.id, peer_id);

        if let Some(old) = self.session.set_transport(side, peer_id, transport) {
            warn!(
                "Replaced {} transport {} owned by {}",
                side,
                old.get().transport.id(),
                old.owner()
            );
        }

        Ok(SignalReply::Transport(params))
    }

    async fn connect_transport(
        &mut self,
        peer_id: PeerId,
        side: TransportSide,
        dtls_parameters: Value,
    ) -> SignalResult {
        let entry = self.session.owned_transport(side, &peer_id)?;
        if entry.connected {
            return Err(SignalError::precondition(format!(
                "the {side} transport is already connected"
            )));
        }

        entry.transport.connect(dtls_parameters).await?;
        entry.connected = true;

        info!("Connected {} transport {}", side, entry.transport.id());
        Ok(SignalReply::Ack)
    }

    async fn produce(
        &mut self,
        peer_id: PeerId,
        kind: MediaKind,
        rtp_parameters: Value,
    ) -> SignalResult {
        let transport = self
            .session
            .connected_transport(TransportSide::Producer, &peer_id)?;
        let producer = transport.produce(kind, rtp_parameters).await?;
        let id = producer.id();

        info!("{} producer {} created by {}", kind, id, peer_id);

        if let Some(old) = self.session.set_producer(peer_id, producer) {
            warn!(
                "Replaced producer {} owned by {}; its consumers are orphaned",
                old.get().id(),
                old.owner()
            );
        }

        self.signaling
            .broadcast_except(peer_id, ServerMessage::NewProducer)
            .await;

        Ok(SignalReply::Produced(ProducedParams { id }))
    }

    async fn create_consumer(&mut self, peer_id: PeerId, rtp_capabilities: Value) -> SignalResult {
        let (producer_id, producer_kind) = match self.session.producer() {
            Some(producer) => (producer.id(), producer.kind()),
            None => return Err(SignalError::precondition("no producer to consume")),
        };

        let transport = self
            .session
            .connected_transport(TransportSide::Consumer, &peer_id)?;

        if !self.router.can_consume(&producer_id, &rtp_capabilities) {
            error!("{} can not consume producer {}", peer_id, producer_id);
            return Err(SignalError::CannotConsume {
                detail: format!(
                    "rtp capabilities are not compatible with producer {producer_id}"
                ),
            });
        }

        let consumer = transport
            .consume(
                &producer_id,
                rtp_capabilities,
                producer_kind == MediaKind::Video,
            )
            .await?;

        if consumer.consumer_type() == ConsumerType::Simulcast {
            if let Err(e) = consumer.set_preferred_layers(PREFERRED_LAYERS).await {
                warn!("Failed to set preferred layers on {}: {}", consumer.id(), e);
            }
        }

        let params = ConsumerParams {
            producer_id,
            id: consumer.id(),
            kind: consumer.kind(),
            rtp_parameters: consumer.rtp_parameters(),
            consumer_type: consumer.consumer_type(),
            // Media will not flow until resume while either side is paused.
            producer_paused: consumer.paused() || consumer.producer_paused(),
            paused: consumer.paused(),
        };

        info!(
            "{} consumer {} of producer {} created for {}",
            params.kind, params.id, params.producer_id, peer_id
        );

        if let Some(old) = self.session.set_consumer(peer_id, consumer) {
            warn!("Replaced consumer {} owned by {}", old.get().id(), old.owner());
        }

        Ok(SignalReply::Consumed(params))
    }

    async fn resume(&mut self, peer_id: PeerId) -> SignalResult {
        let consumer = self.session.owned_consumer(&peer_id)?;
        consumer.resume().await?;

        info!("Resumed consumer {}", consumer.id());
        Ok(SignalReply::Ack)
    }
}
