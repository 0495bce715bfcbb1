mod error;
mod media;
mod peer;
mod request;
mod signaling;

pub use error::SignalError;
pub use media::{ConsumerId, ConsumerType, MediaKind, ProducerId, TransportId};
pub use peer::{InvalidPeerId, PeerId};
pub use request::RequestId;
pub use signaling::{
    ClientMessage, ConsumerParams, ProducedParams, ReplyBody, ServerMessage, SignalReply,
    SignalRequest, TransportParams,
};
