use alloy_primitives::{Address, B256, keccak256};

use crate::{DomainId, ResourceId};

/// Derived, destination-side value built from a [`crate::Message`] by a
/// voter-side handler. Lives only for the duration of one `voteProposal`
/// submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub source: DomainId,
    pub deposit_nonce: u64,
    pub resource_id: ResourceId,
    /// ABI-encoded payload, shape dependent on the resource's transfer type.
    pub data: Vec<u8>,
    pub handler_address: Address,
    pub bridge_address: Address,
}

impl Proposal {
    pub fn new(
        source: DomainId,
        deposit_nonce: u64,
        resource_id: ResourceId,
        data: Vec<u8>,
        handler_address: Address,
        bridge_address: Address,
    ) -> Self {
        Self {
            source,
            deposit_nonce,
            resource_id,
            data,
            handler_address,
            bridge_address,
        }
    }

    /// `keccak256(handlerAddress ‖ data)`, used as the in-flight vote key.
    pub fn data_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(20 + self.data.len());
        buf.extend_from_slice(self.handler_address.as_slice());
        buf.extend_from_slice(&self.data);
        keccak256(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_hash_depends_only_on_handler_and_data() {
        let p1 = Proposal::new(
            DomainId::new(1),
            7,
            ResourceId::new([1u8; 32]),
            vec![1, 2, 3],
            Address::repeat_byte(0xAA),
            Address::repeat_byte(0xBB),
        );
        let p2 = Proposal::new(
            DomainId::new(2), // different source/nonce/resourceId...
            99,
            ResourceId::new([9u8; 32]),
            vec![1, 2, 3], // ...same data
            Address::repeat_byte(0xAA), // same handler
            Address::repeat_byte(0xCC), // different bridge
        );
        assert_eq!(p1.data_hash(), p2.data_hash());
    }

    #[test]
    fn data_hash_changes_with_data() {
        let base = Proposal::new(
            DomainId::new(1),
            7,
            ResourceId::new([1u8; 32]),
            vec![1, 2, 3],
            Address::repeat_byte(0xAA),
            Address::repeat_byte(0xBB),
        );
        let mut other = base.clone();
        other.data = vec![1, 2, 4];
        assert_ne!(base.data_hash(), other.data_hash());
    }
}
