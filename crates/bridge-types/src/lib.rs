//! Core data model shared by every component of the bridge relayer.
//!
//! A [`Message`] is the intent extracted from a source-chain `Deposit` event.
//! It travels, unmodified, from the event poller through the router to the
//! voter, which turns it into a [`Proposal`] for the destination chain's
//! bridge contract.

mod domain_id;
mod message;
mod payload;
mod proposal;
mod resource_id;

pub use domain_id::DomainId;
pub use message::Message;
pub use payload::{Payload, TransferType};
pub use proposal::Proposal;
pub use resource_id::{ResourceId, ResourceIdError};
