use std::sync::Arc;

use alloy_primitives::{Address, B256, Bytes};
use bridge_evm::EvmChainClient;

use crate::error::TransactorError;

/// Builds, signs and submits legacy transactions against one chain client.
///
/// The lock/read/build-and-send/increase/unlock sequence stays visible here
/// rather than inside [`EvmChainClient::sign_and_send_transaction`], so a
/// receipt wait (or a fee re-quote) never ends up nested inside the nonce
/// critical section. Holds the client behind an [`Arc`] because the same
/// connection also backs that domain's [`crate::poller::EventPoller`]: one
/// chain serves both the read side and the write side of the relay engine.
pub struct Transactor {
    client: Arc<EvmChainClient>,
}

impl Transactor {
    pub fn new(client: Arc<EvmChainClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &EvmChainClient {
        &self.client
    }

    /// Send `data` as a call to `to`, using the next round-robin signer.
    /// Returns the locally computed transaction hash; does not wait for a
    /// receipt.
    pub async fn execute(&self, to: Address, data: Bytes) -> Result<B256, TransactorError> {
        let from = self.client.next_signer_address();
        let gas_price = self.client.gas_price().await?;

        let mut nonce = self.client.lock_nonce(from).await;
        let current = self.client.nonce(&mut nonce).await?;

        match self
            .client
            .sign_and_send_transaction(from, to, data, current, &gas_price)
            .await
        {
            Ok(hash) => {
                nonce.unsafe_increase_nonce();
                Ok(hash)
            }
            Err(err) => {
                self.client.reset_nonce(from).await;
                Err(err.into())
            }
        }
    }
}
