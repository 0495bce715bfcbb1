use crate::engine::{EngineError, TransportOptions};
use async_trait::async_trait;
use relay_core::{
    ConsumerId, ConsumerType, MediaKind, ProducerId, TransportId, TransportParams,
};
use serde_json::Value;

/// Spatial/temporal layer pair for simulcast consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerLayers {
    pub spatial: u8,
    pub temporal: u8,
}

/// Simulcast consumers always ask for the highest layer pair.
pub const PREFERRED_LAYERS: ConsumerLayers = ConsumerLayers {
    spatial: 2,
    temporal: 2,
};

/// The room's routing context. Created once with the worker and kept for the
/// lifetime of the process.
#[async_trait]
pub trait MediaRouter: Send + Sync + 'static {
    /// Capability descriptor clients load their device with. Never changes.
    fn rtp_capabilities(&self) -> Value;

    fn can_consume(&self, producer_id: &ProducerId, rtp_capabilities: &Value) -> bool;

    async fn create_webrtc_transport(
        &self,
        options: &TransportOptions,
    ) -> Result<Box<dyn MediaTransport>, EngineError>;
}

#[async_trait]
pub trait MediaTransport: Send + Sync {
    fn id(&self) -> TransportId;

    /// ICE/DTLS parameters the client needs to mirror this transport.
    fn params(&self) -> TransportParams;

    async fn set_max_incoming_bitrate(&self, bitrate: u32) -> Result<(), EngineError>;

    async fn connect(&self, dtls_parameters: Value) -> Result<(), EngineError>;

    async fn produce(
        &self,
        kind: MediaKind,
        rtp_parameters: Value,
    ) -> Result<Box<dyn MediaProducer>, EngineError>;

    async fn consume(
        &self,
        producer_id: &ProducerId,
        rtp_capabilities: Value,
        paused: bool,
    ) -> Result<Box<dyn MediaConsumer>, EngineError>;
}

pub trait MediaProducer: Send + Sync {
    fn id(&self) -> ProducerId;

    fn kind(&self) -> MediaKind;
}

#[async_trait]
pub trait MediaConsumer: Send + Sync {
    fn id(&self) -> ConsumerId;

    fn producer_id(&self) -> ProducerId;

    fn kind(&self) -> MediaKind;

    fn rtp_parameters(&self) -> Value;

    fn consumer_type(&self) -> ConsumerType;

    fn paused(&self) -> bool;

    fn producer_paused(&self) -> bool;

    /// Only meaningful when [`consumer_type`](Self::consumer_type) is simulcast.
    async fn set_preferred_layers(&self, layers: ConsumerLayers) -> Result<(), EngineError>;

    async fn resume(&self) -> Result<(), EngineError>;
}
