use relay_core::{ConsumerId, MediaKind, PeerId, ProducerId, TransportId};
use serde::Serialize;

/// Read-only view of the session, detached from the engine handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub producer: Option<ProducerView>,
    pub consumer: Option<ConsumerView>,
    pub producer_transport: Option<TransportView>,
    pub consumer_transport: Option<TransportView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerView {
    pub id: ProducerId,
    pub kind: MediaKind,
    pub owner: PeerId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerView {
    pub id: ConsumerId,
    pub producer_id: ProducerId,
    pub kind: MediaKind,
    pub paused: bool,
    pub owner: PeerId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportView {
    pub id: TransportId,
    pub connected: bool,
    pub owner: PeerId,
}
