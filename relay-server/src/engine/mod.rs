//! Seam between the coordinator and the media engine.
//!
//! The coordinator only talks to the traits in [`media_objects`]; the production
//! binding lives in [`mediasoup`] behind the `mediasoup` cargo feature. Engine
//! objects are released when their handle is dropped.

mod engine_error;
mod media_objects;
mod transport_options;
mod worker_options;

#[cfg(feature = "mediasoup")]
pub mod mediasoup;

pub use engine_error::EngineError;
pub use media_objects::{
    ConsumerLayers, MediaConsumer, MediaProducer, MediaRouter, MediaTransport, PREFERRED_LAYERS,
};
pub use transport_options::{ListenIp, TransportOptions};
pub use worker_options::{EngineLogLevel, KNOWN_LOG_TAGS, WorkerOptions};
