pub mod mock_signaling;

pub use mock_engine::*;
pub use mock_signaling::*;
pub use test_client::*;
