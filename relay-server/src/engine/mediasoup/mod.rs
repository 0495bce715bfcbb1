//! mediasoup binding: one worker, one router, and adapters from mediasoup's
//! transport/producer/consumer handles to the engine traits.

mod media_codecs;
mod mediasoup_engine;
mod mediasoup_objects;

pub use media_codecs::media_codecs;
pub use mediasoup_engine::MediasoupEngine;
