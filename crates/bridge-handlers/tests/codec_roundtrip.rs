use alloy_primitives::Address;
use bridge_handlers::{DepositDecoder, Erc20Decoder, Erc20ProposalBuilder, ProposalBuilder};
use bridge_types::{DomainId, ResourceId};

fn left_pad32(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    out[start..].copy_from_slice(bytes);
    out
}

fn resource_id() -> ResourceId {
    let mut bytes = [0u8; 32];
    bytes[31] = 7;
    ResourceId::new(bytes)
}

/// A fungible deposit decoded off a source chain and re-encoded for the
/// destination's `voteProposal` call must come back byte-identical: the
/// handler contract on the destination side expects exactly the layout the
/// source handler emitted.
#[test]
fn fungible_deposit_round_trips_through_decode_and_rebuild() {
    let recipient = [0x42u8; 20];
    let mut calldata = left_pad32(&999_999u64.to_be_bytes());
    calldata.extend(left_pad32(&(recipient.len() as u64).to_be_bytes()));
    calldata.extend_from_slice(&recipient);

    let message = Erc20Decoder
        .decode(DomainId::new(1), DomainId::new(2), 42, resource_id(), &calldata)
        .expect("well-formed calldata decodes");

    let proposal = Erc20ProposalBuilder
        .build(&message, Address::repeat_byte(0x11), Address::repeat_byte(0x22))
        .expect("fungible payload builds");

    assert_eq!(proposal.data, calldata);
    assert_eq!(proposal.source, DomainId::new(1));
    assert_eq!(proposal.deposit_nonce, 42);
}

/// A recipient that doesn't fill a clean 20 bytes (a non-EVM-address-shaped
/// recipient, e.g. 32 bytes) must round-trip too — the codec doesn't assume
/// a fixed recipient width.
#[test]
fn round_trip_preserves_non_standard_recipient_width() {
    let recipient = [0x9Au8; 32];
    let mut calldata = left_pad32(&1u64.to_be_bytes());
    calldata.extend(left_pad32(&(recipient.len() as u64).to_be_bytes()));
    calldata.extend_from_slice(&recipient);

    let message = Erc20Decoder
        .decode(DomainId::new(3), DomainId::new(4), 1, resource_id(), &calldata)
        .expect("well-formed calldata decodes");

    let proposal = Erc20ProposalBuilder
        .build(&message, Address::repeat_byte(0xAA), Address::repeat_byte(0xBB))
        .expect("fungible payload builds");

    assert_eq!(proposal.data, calldata);
}
