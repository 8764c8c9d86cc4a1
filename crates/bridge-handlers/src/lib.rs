//! Resource-address-keyed decoders (source side) and proposal builders
//! (destination side), plus the registries that resolve a bridge handler
//! address to one of each.

mod decoder;
mod proposal_builder;
mod registry;

pub use decoder::{DepositDecoder, Erc20Decoder};
pub use proposal_builder::{Erc20ProposalBuilder, ProposalBuilder};
pub use registry::{DestHandlerRegistry, SourceHandlerRegistry};

use alloy_primitives::Address;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("no handler registered for address {0}")]
    UnknownHandler(Address),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

fn left_pad32(bytes: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    let take = bytes.len().min(32);
    out[start..].copy_from_slice(&bytes[bytes.len() - take..]);
    out
}
