use crate::model::error::SignalError;
use crate::model::media::{ConsumerId, ConsumerType, MediaKind, ProducerId, TransportId};
use crate::model::peer::PeerId;
use crate::model::request::RequestId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request catalog.
///
/// Requests without payload accept any `d` (or none); browser clients attach
/// extra fields the coordinator does not use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "camelCase",
    rename_all_fields = "camelCase",
    try_from = "RawRequest"
)]
pub enum SignalRequest {
    GetRouterRtpCapabilities,
    CreateProducerTransport,
    CreateConsumerTransport,
    ConnectProducerTransport {
        dtls_parameters: Value,
    },
    ConnectConsumerTransport {
        dtls_parameters: Value,
    },
    Produce {
        kind: MediaKind,
        rtp_parameters: Value,
    },
    Consume {
        rtp_capabilities: Value,
    },
    Resume,
}

impl SignalRequest {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetRouterRtpCapabilities => "getRouterRtpCapabilities",
            Self::CreateProducerTransport => "createProducerTransport",
            Self::CreateConsumerTransport => "createConsumerTransport",
            Self::ConnectProducerTransport { .. } => "connectProducerTransport",
            Self::ConnectConsumerTransport { .. } => "connectConsumerTransport",
            Self::Produce { .. } => "produce",
            Self::Consume { .. } => "consume",
            Self::Resume => "resume",
        }
    }
}

#[derive(Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    d: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DtlsPayload {
    dtls_parameters: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProducePayload {
    kind: MediaKind,
    rtp_parameters: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsumePayload {
    rtp_capabilities: Value,
}

fn payload<T: DeserializeOwned>(op: &str, d: Value) -> Result<T, String> {
    serde_json::from_value(d).map_err(|e| format!("invalid payload for {op}: {e}"))
}

impl TryFrom<RawRequest> for SignalRequest {
    type Error = String;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let RawRequest { op, d } = raw;
        let request = match op.as_str() {
            "getRouterRtpCapabilities" => Self::GetRouterRtpCapabilities,
            "createProducerTransport" => Self::CreateProducerTransport,
            "createConsumerTransport" => Self::CreateConsumerTransport,
            "connectProducerTransport" => {
                let DtlsPayload { dtls_parameters } = payload(&op, d)?;
                Self::ConnectProducerTransport { dtls_parameters }
            }
            "connectConsumerTransport" => {
                let DtlsPayload { dtls_parameters } = payload(&op, d)?;
                Self::ConnectConsumerTransport { dtls_parameters }
            }
            "produce" => {
                let ProducePayload {
                    kind,
                    rtp_parameters,
                } = payload(&op, d)?;
                Self::Produce {
                    kind,
                    rtp_parameters,
                }
            }
            "consume" => {
                let ConsumePayload { rtp_capabilities } = payload(&op, d)?;
                Self::Consume { rtp_capabilities }
            }
            "resume" => Self::Resume,
            other => return Err(format!("unknown op '{other}'")),
        };
        Ok(request)
    }
}

/// Envelope for every client frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub id: RequestId,
    pub request: SignalRequest,
}

/// Parameters a client needs to build its side of a WebRTC transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportParams {
    pub id: TransportId,
    pub ice_parameters: Value,
    pub ice_candidates: Value,
    pub dtls_parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedParams {
    pub id: ProducerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerParams {
    pub producer_id: ProducerId,
    pub id: ConsumerId,
    pub kind: MediaKind,
    pub rtp_parameters: Value,
    #[serde(rename = "type")]
    pub consumer_type: ConsumerType,
    /// True while media cannot flow: the consumer awaits `resume` or the
    /// producer itself is paused.
    pub producer_paused: bool,
    /// The consumer's own paused flag.
    pub paused: bool,
}

/// Successful reply payload; serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SignalReply {
    Ack,
    RtpCapabilities(Value),
    Transport(TransportParams),
    Produced(ProducedParams),
    Consumed(ConsumerParams),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplyBody {
    Ok(SignalReply),
    Error(SignalError),
}

impl From<Result<SignalReply, SignalError>> for ReplyBody {
    fn from(result: Result<SignalReply, SignalError>) -> Self {
        match result {
            Ok(reply) => Self::Ok(reply),
            Err(err) => Self::Error(err),
        }
    }
}

/// Frames sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Welcome { peer_id: PeerId },
    Response { id: RequestId, result: ReplyBody },
    NewProducer,
    InvalidRequest { message: String },
}
