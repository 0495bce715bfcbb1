//! Wire model shared by the relay signaling server and its clients.

pub mod model;

pub use model::*;
