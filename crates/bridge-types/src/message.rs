use crate::{DomainId, Payload, ResourceId};

/// A cross-chain transfer intent, decoded from a source-chain `Deposit` log.
///
/// `(source, deposit_nonce)` uniquely identifies a message across the
/// lifetime of the bridge. Once produced by the decoder a `Message` is never
/// mutated; it is only read as it moves from poller to router to voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source: DomainId,
    pub destination: DomainId,
    pub deposit_nonce: u64,
    pub resource_id: ResourceId,
    pub payload: Payload,
}

impl Message {
    pub fn new(
        source: DomainId,
        destination: DomainId,
        deposit_nonce: u64,
        resource_id: ResourceId,
        payload: Payload,
    ) -> Self {
        Self {
            source,
            destination,
            deposit_nonce,
            resource_id,
            payload,
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Message(source={}, destination={}, nonce={}, resource={}, type={})",
            self.source,
            self.destination,
            self.deposit_nonce,
            self.resource_id,
            self.payload.kind()
        )
    }
}
