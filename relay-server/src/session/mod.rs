mod owned;
mod session_snapshot;
mod session_state;

pub use owned::*;
pub use session_snapshot::*;
pub use session_state::*;
