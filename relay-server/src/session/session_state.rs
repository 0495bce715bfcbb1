use crate::engine::{MediaConsumer, MediaProducer, MediaTransport};
use crate::session::{
    ConsumerView, Owned, ProducerView, SessionSnapshot, TransportEntry, TransportView,
};
use relay_core::{ConsumerId, PeerId, ProducerId, SignalError, TransportId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSide {
    Producer,
    Consumer,
}

impl fmt::Display for TransportSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producer => f.write_str("producer"),
            Self::Consumer => f.write_str("consumer"),
        }
    }
}

/// Ids of everything a closing connection released.
#[derive(Debug, Default, PartialEq)]
pub struct Released {
    pub producer: Option<ProducerId>,
    pub consumer: Option<ConsumerId>,
    pub producer_transport: Option<TransportId>,
    pub consumer_transport: Option<TransportId>,
}

impl Released {
    pub fn is_empty(&self) -> bool {
        self.producer.is_none()
            && self.consumer.is_none()
            && self.producer_transport.is_none()
            && self.consumer_transport.is_none()
    }
}

/// The room's single producer/consumer pair and their transports.
///
/// Only the coordinator holds this, so every mutation is serialized by its
/// command loop. Replacing or releasing a slot drops the engine handle, which
/// closes the underlying engine object.
#[derive(Default)]
pub struct SessionState {
    producer: Option<Owned<Box<dyn MediaProducer>>>,
    consumer: Option<Owned<Box<dyn MediaConsumer>>>,
    producer_transport: Option<Owned<TransportEntry>>,
    consumer_transport: Option<Owned<TransportEntry>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn transport_slot(&mut self, side: TransportSide) -> &mut Option<Owned<TransportEntry>> {
        match side {
            TransportSide::Producer => &mut self.producer_transport,
            TransportSide::Consumer => &mut self.consumer_transport,
        }
    }

    /// Store a freshly created transport, returning the one it replaced.
    pub fn set_transport(
        &mut self,
        side: TransportSide,
        owner: PeerId,
        transport: Box<dyn MediaTransport>,
    ) -> Option<Owned<TransportEntry>> {
        self.transport_slot(side)
            .replace(Owned::new(owner, TransportEntry::new(transport)))
    }

    /// The transport on `side`, provided `peer_id` created it.
    pub fn owned_transport(
        &mut self,
        side: TransportSide,
        peer_id: &PeerId,
    ) -> Result<&mut TransportEntry, SignalError> {
        match self.transport_slot(side) {
            None => Err(SignalError::precondition(format!(
                "no {side} transport has been created"
            ))),
            Some(slot) if !slot.is_owned_by(peer_id) => Err(SignalError::precondition(format!(
                "the {side} transport belongs to another connection"
            ))),
            Some(slot) => Ok(slot.get_mut()),
        }
    }

    /// Like [`owned_transport`](Self::owned_transport), but also requires the
    /// transport to be connected.
    pub fn connected_transport(
        &mut self,
        side: TransportSide,
        peer_id: &PeerId,
    ) -> Result<&dyn MediaTransport, SignalError> {
        let entry = self.owned_transport(side, peer_id)?;
        if !entry.connected {
            return Err(SignalError::precondition(format!(
                "the {side} transport is not connected"
            )));
        }
        Ok(entry.transport.as_ref())
    }

    pub fn producer(&self) -> Option<&dyn MediaProducer> {
        self.producer.as_ref().map(|slot| slot.get().as_ref())
    }

    pub fn set_producer(
        &mut self,
        owner: PeerId,
        producer: Box<dyn MediaProducer>,
    ) -> Option<Owned<Box<dyn MediaProducer>>> {
        self.producer.replace(Owned::new(owner, producer))
    }

    pub fn set_consumer(
        &mut self,
        owner: PeerId,
        consumer: Box<dyn MediaConsumer>,
    ) -> Option<Owned<Box<dyn MediaConsumer>>> {
        self.consumer.replace(Owned::new(owner, consumer))
    }

    /// The current consumer, provided `peer_id` created it.
    pub fn owned_consumer(&self, peer_id: &PeerId) -> Result<&dyn MediaConsumer, SignalError> {
        match &self.consumer {
            None => Err(SignalError::precondition("no consumer has been created")),
            Some(slot) if !slot.is_owned_by(peer_id) => Err(SignalError::precondition(
                "the consumer belongs to another connection",
            )),
            Some(slot) => Ok(slot.get().as_ref()),
        }
    }

    /// Drop every slot `peer_id` owns.
    pub fn release_owned_by(&mut self, peer_id: &PeerId) -> Released {
        fn take_if_owned<T>(slot: &mut Option<Owned<T>>, peer_id: &PeerId) -> Option<T> {
            if slot.as_ref().is_some_and(|s| s.is_owned_by(peer_id)) {
                slot.take().map(Owned::into_inner)
            } else {
                None
            }
        }

        // Consumers go before the transports that carry them.
        Released {
            consumer: take_if_owned(&mut self.consumer, peer_id).map(|c| c.id()),
            producer: take_if_owned(&mut self.producer, peer_id).map(|p| p.id()),
            consumer_transport: take_if_owned(&mut self.consumer_transport, peer_id)
                .map(|t| t.transport.id()),
            producer_transport: take_if_owned(&mut self.producer_transport, peer_id)
                .map(|t| t.transport.id()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let transport_view = |slot: &Option<Owned<TransportEntry>>| {
            slot.as_ref().map(|s| TransportView {
                id: s.get().transport.id(),
                connected: s.get().connected,
                owner: s.owner(),
            })
        };

        SessionSnapshot {
            producer: self.producer.as_ref().map(|s| ProducerView {
                id: s.get().id(),
                kind: s.get().kind(),
                owner: s.owner(),
            }),
            consumer: self.consumer.as_ref().map(|s| ConsumerView {
                id: s.get().id(),
                producer_id: s.get().producer_id(),
                kind: s.get().kind(),
                paused: s.get().paused(),
                owner: s.owner(),
            }),
            producer_transport: transport_view(&self.producer_transport),
            consumer_transport: transport_view(&self.consumer_transport),
        }
    }
}
