pub mod config;
mod coordinator;
pub mod engine;
pub mod error;
pub mod http;
mod session;
mod signaling;
pub mod supervisor;

pub use coordinator::*;
pub use session::*;
pub use signaling::*;
