use alloy_primitives::Address;
use bridge_types::{Message, Payload, Proposal};

use crate::{DecodeError, left_pad32};

/// Turns a routed [`Message`] into a destination-chain [`Proposal`].
/// Registered per handler-contract address in a [`crate::DestHandlerRegistry`].
pub trait ProposalBuilder: Send + Sync {
    fn build(
        &self,
        message: &Message,
        handler_address: Address,
        bridge_address: Address,
    ) -> Result<Proposal, DecodeError>;
}

/// Re-encodes a fungible payload into the same
/// `leftPad32(amount) ‖ leftPad32(len(recipient)) ‖ recipient` layout the
/// source-side decoder accepted, so `voteProposal` calldata is byte-identical
/// to what a correctly-encoded `Deposit` carried.
#[derive(Debug, Default)]
pub struct Erc20ProposalBuilder;

impl ProposalBuilder for Erc20ProposalBuilder {
    fn build(
        &self,
        message: &Message,
        handler_address: Address,
        bridge_address: Address,
    ) -> Result<Proposal, DecodeError> {
        let Payload::Fungible { amount, recipient } = &message.payload else {
            return Err(DecodeError::MalformedPayload(
                "erc20 proposal builder received a non-fungible payload".into(),
            ));
        };

        let mut data = Vec::with_capacity(64 + recipient.len());
        data.extend_from_slice(amount);
        data.extend(left_pad32(&(recipient.len() as u64).to_be_bytes()));
        data.extend_from_slice(recipient);

        Ok(Proposal::new(
            message.source,
            message.deposit_nonce,
            message.resource_id,
            data,
            handler_address,
            bridge_address,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::DomainId;
    use bridge_types::ResourceId;

    #[test]
    fn re_encodes_identically_to_the_source_layout() {
        let recipient = vec![0xCCu8; 20];
        let message = Message::new(
            DomainId::new(1),
            DomainId::new(2),
            7,
            ResourceId::new([1u8; 32]),
            Payload::Fungible {
                amount: [0x64u8; 32],
                recipient: recipient.clone(),
            },
        );
        let proposal = Erc20ProposalBuilder
            .build(&message, Address::repeat_byte(0xAA), Address::repeat_byte(0xBB))
            .unwrap();
        assert_eq!(&proposal.data[0..32], &[0x64u8; 32]);
        assert_eq!(proposal.data[63], 20);
        assert_eq!(&proposal.data[64..], recipient.as_slice());
    }
}
