use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;

use crate::{DecodeError, DepositDecoder, ProposalBuilder};

/// Maps a bridge handler-contract address to the decoder that understands
/// its `Deposit` calldata layout.
#[derive(Default)]
pub struct SourceHandlerRegistry {
    handlers: HashMap<Address, Arc<dyn DepositDecoder>>,
}

impl SourceHandlerRegistry {
    pub fn register(&mut self, address: Address, decoder: Arc<dyn DepositDecoder>) {
        tracing::info!(%address, "registered deposit decoder");
        self.handlers.insert(address, decoder);
    }

    pub fn resolve(&self, address: Address) -> Result<&Arc<dyn DepositDecoder>, DecodeError> {
        self.handlers
            .get(&address)
            .ok_or(DecodeError::UnknownHandler(address))
    }
}

/// Maps a bridge handler-contract address to the proposal builder that
/// re-encodes a routed message for that handler's `voteProposal` calldata.
#[derive(Default)]
pub struct DestHandlerRegistry {
    handlers: HashMap<Address, Arc<dyn ProposalBuilder>>,
}

impl DestHandlerRegistry {
    pub fn register(&mut self, address: Address, builder: Arc<dyn ProposalBuilder>) {
        tracing::info!(%address, "registered proposal builder");
        self.handlers.insert(address, builder);
    }

    pub fn resolve(&self, address: Address) -> Result<&Arc<dyn ProposalBuilder>, DecodeError> {
        self.handlers
            .get(&address)
            .ok_or(DecodeError::UnknownHandler(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Erc20Decoder;

    #[test]
    fn unknown_address_is_reported_without_panicking() {
        let registry = SourceHandlerRegistry::default();
        let err = registry.resolve(Address::repeat_byte(0x01)).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownHandler(_)));
    }

    #[test]
    fn registered_address_resolves() {
        let mut registry = SourceHandlerRegistry::default();
        let addr = Address::repeat_byte(0x02);
        registry.register(addr, Arc::new(Erc20Decoder));
        assert!(registry.resolve(addr).is_ok());
    }
}
