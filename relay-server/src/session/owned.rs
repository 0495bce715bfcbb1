use crate::engine::MediaTransport;
use relay_core::PeerId;

/// A session slot value tagged with the connection that created it.
pub struct Owned<T> {
    owner: PeerId,
    value: T,
}

impl<T> Owned<T> {
    pub fn new(owner: PeerId, value: T) -> Self {
        Self { owner, value }
    }

    pub fn owner(&self) -> PeerId {
        self.owner
    }

    pub fn is_owned_by(&self, peer_id: &PeerId) -> bool {
        &self.owner == peer_id
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

pub struct TransportEntry {
    pub transport: Box<dyn MediaTransport>,
    /// Set once the client's DTLS parameters were accepted.
    pub connected: bool,
}

impl TransportEntry {
    pub fn new(transport: Box<dyn MediaTransport>) -> Self {
        Self {
            transport,
            connected: false,
        }
    }
}
