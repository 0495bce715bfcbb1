use crate::engine::{ConsumerLayers, EngineError, MediaConsumer, MediaProducer, MediaTransport};
use async_trait::async_trait;
use mediasoup::prelude::{
    Consumer, ConsumerOptions, DtlsParameters, Producer, ProducerOptions, RtpCapabilities,
    RtpParameters, Transport as _, WebRtcTransport, WebRtcTransportRemoteParameters,
};
use mediasoup::prelude as ms;
use relay_core::{
    ConsumerId, ConsumerType, MediaKind, ProducerId, TransportId, TransportParams,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a client descriptor into its mediasoup type.
pub(super) fn decode<T: DeserializeOwned>(what: &'static str, value: Value) -> Result<T, EngineError> {
    serde_json::from_value(value).map_err(|e| EngineError::invalid(what, e))
}

fn encode<T: Serialize>(what: &'static str, value: T) -> Result<Value, EngineError> {
    serde_json::to_value(value).map_err(|e| EngineError::request(format!("encoding {what}: {e}")))
}

fn to_engine_kind(kind: MediaKind) -> ms::MediaKind {
    match kind {
        MediaKind::Audio => ms::MediaKind::Audio,
        MediaKind::Video => ms::MediaKind::Video,
    }
}

fn from_engine_kind(kind: ms::MediaKind) -> MediaKind {
    match kind {
        ms::MediaKind::Audio => MediaKind::Audio,
        ms::MediaKind::Video => MediaKind::Video,
    }
}

pub(super) struct MediasoupTransport {
    transport: WebRtcTransport,
    params: TransportParams,
}

impl MediasoupTransport {
    pub(super) fn new(transport: WebRtcTransport) -> Result<Self, EngineError> {
        let params = TransportParams {
            id: TransportId(transport.id().to_string()),
            ice_parameters: encode("iceParameters", transport.ice_parameters())?,
            ice_candidates: encode("iceCandidates", transport.ice_candidates())?,
            dtls_parameters: encode("dtlsParameters", transport.dtls_parameters())?,
        };
        Ok(Self { transport, params })
    }
}

#[async_trait]
impl MediaTransport for MediasoupTransport {
    fn id(&self) -> TransportId {
        self.params.id.clone()
    }

    fn params(&self) -> TransportParams {
        self.params.clone()
    }

    async fn set_max_incoming_bitrate(&self, bitrate: u32) -> Result<(), EngineError> {
        self.transport
            .set_max_incoming_bitrate(bitrate)
            .await
            .map_err(EngineError::request)
    }

    async fn connect(&self, dtls_parameters: Value) -> Result<(), EngineError> {
        let dtls_parameters: DtlsParameters = decode("dtlsParameters", dtls_parameters)?;
        self.transport
            .connect(WebRtcTransportRemoteParameters { dtls_parameters })
            .await
            .map_err(EngineError::request)
    }

    async fn produce(
        &self,
        kind: MediaKind,
        rtp_parameters: Value,
    ) -> Result<Box<dyn MediaProducer>, EngineError> {
        let rtp_parameters: RtpParameters = decode("rtpParameters", rtp_parameters)?;
        let producer = self
            .transport
            .produce(ProducerOptions::new(to_engine_kind(kind), rtp_parameters))
            .await
            .map_err(EngineError::request)?;
        Ok(Box::new(MediasoupProducer(producer)))
    }

    async fn consume(
        &self,
        producer_id: &ProducerId,
        rtp_capabilities: Value,
        paused: bool,
    ) -> Result<Box<dyn MediaConsumer>, EngineError> {
        let producer_id = decode("producer id", Value::String(producer_id.0.clone()))?;
        let rtp_capabilities: RtpCapabilities = decode("rtpCapabilities", rtp_capabilities)?;

        let mut options = ConsumerOptions::new(producer_id, rtp_capabilities);
        options.paused = paused;

        let consumer = self
            .transport
            .consume(options)
            .await
            .map_err(EngineError::request)?;
        let rtp_parameters = encode("rtpParameters", consumer.rtp_parameters())?;
        Ok(Box::new(MediasoupConsumer {
            consumer,
            rtp_parameters,
        }))
    }
}

struct MediasoupProducer(Producer);

impl MediaProducer for MediasoupProducer {
    fn id(&self) -> ProducerId {
        ProducerId(self.0.id().to_string())
    }

    fn kind(&self) -> MediaKind {
        from_engine_kind(self.0.kind())
    }
}

struct MediasoupConsumer {
    consumer: Consumer,
    rtp_parameters: Value,
}

#[async_trait]
impl MediaConsumer for MediasoupConsumer {
    fn id(&self) -> ConsumerId {
        ConsumerId(self.consumer.id().to_string())
    }

    fn producer_id(&self) -> ProducerId {
        ProducerId(self.consumer.producer_id().to_string())
    }

    fn kind(&self) -> MediaKind {
        from_engine_kind(self.consumer.kind())
    }

    fn rtp_parameters(&self) -> Value {
        self.rtp_parameters.clone()
    }

    fn consumer_type(&self) -> ConsumerType {
        match self.consumer.r#type() {
            ms::ConsumerType::Simple => ConsumerType::Simple,
            ms::ConsumerType::Simulcast => ConsumerType::Simulcast,
            ms::ConsumerType::Svc => ConsumerType::Svc,
            ms::ConsumerType::Pipe => ConsumerType::Pipe,
        }
    }

    fn paused(&self) -> bool {
        self.consumer.paused()
    }

    fn producer_paused(&self) -> bool {
        self.consumer.producer_paused()
    }

    async fn set_preferred_layers(&self, layers: ConsumerLayers) -> Result<(), EngineError> {
        self.consumer
            .set_preferred_layers(ms::ConsumerLayers {
                spatial_layer: layers.spatial,
                temporal_layer: Some(layers.temporal),
            })
            .await
            .map_err(EngineError::request)
    }

    async fn resume(&self) -> Result<(), EngineError> {
        self.consumer.resume().await.map_err(EngineError::request)
    }
}
