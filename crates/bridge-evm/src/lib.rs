//! Semantic facade over an EVM JSON-RPC endpoint.
//!
//! [`EvmChainClient`] is the only thing the rest of the relayer knows about
//! talking to a chain: reading blocks and deposit logs, pricing gas, and the
//! explicit nonce-lock / sign-and-send / wait-for-receipt sequence a
//! transactor drives one step at a time.

pub mod abi;
mod client;
mod error;
mod gas;
mod nonce;

pub use abi::{IBridge, IERC20};
pub use client::{EvmChainClient, InnerProvider};
pub use error::ChainClientError;
pub use gas::{Eip1559GasPricer, GasPricer, LegacyGasPricer};
pub use nonce::{NonceCache, NonceHandle};
