use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use bridge_evm::EvmChainClient;
use bridge_handlers::SourceHandlerRegistry;
use bridge_store::BlockStore;
use bridge_types::{DomainId, Message};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BLOCK_RETRY_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_BLOCK_DELAY: u64 = 3;

/// Per-domain event poller: walks the chain head under a confirmation
/// delay, decodes each block's `Deposit` logs, and emits [`Message`]s onto a
/// bounded channel shared by every poller feeding the router.
pub struct EventPoller {
    domain_id: DomainId,
    bridge_address: Address,
    client: Arc<EvmChainClient>,
    block_store: Arc<dyn BlockStore>,
    registry: Arc<SourceHandlerRegistry>,
    block_retry_interval: Duration,
    block_delay: u64,
}

impl EventPoller {
    pub fn new(
        domain_id: DomainId,
        bridge_address: Address,
        client: Arc<EvmChainClient>,
        block_store: Arc<dyn BlockStore>,
        registry: Arc<SourceHandlerRegistry>,
        block_retry_interval: Duration,
        block_delay: u64,
    ) -> Self {
        Self {
            domain_id,
            bridge_address,
            client,
            block_store,
            registry,
            block_retry_interval,
            block_delay,
        }
    }

    /// Run the poll loop until `cancellation` fires. Exits between
    /// iterations, never mid-block.
    pub async fn run(
        &self,
        mut cursor: Option<u64>,
        tx: mpsc::Sender<Message>,
        cancellation: CancellationToken,
    ) {
        loop {
            if cancellation.is_cancelled() {
                tracing::info!(domain = %self.domain_id, "poller stopping");
                return;
            }

            let head = match self.client.latest_block().await {
                Ok(head) => head,
                Err(err) => {
                    tracing::warn!(domain = %self.domain_id, %err, "failed to read chain head, retrying");
                    tokio::time::sleep(self.block_retry_interval).await;
                    continue;
                }
            };

            let current = *cursor.get_or_insert(head);

            if head.saturating_sub(current) < self.block_delay {
                tokio::time::sleep(self.block_retry_interval).await;
                continue;
            }

            let logs = match self
                .client
                .fetch_deposit_logs(self.bridge_address, current, current)
                .await
            {
                Ok(logs) => logs,
                Err(err) => {
                    tracing::warn!(domain = %self.domain_id, block = current, %err, "failed to fetch deposit logs, retrying same block");
                    tokio::time::sleep(self.block_retry_interval).await;
                    continue;
                }
            };

            for log in logs {
                let destination = DomainId::new(log.destinationDomainID);
                let resource_id = bridge_types::ResourceId::new(log.resourceID.0);
                let handler_address = match self
                    .client
                    .bridge(self.bridge_address)
                    .resourceIDToHandlerAddress(log.resourceID)
                    .call()
                    .await
                {
                    Ok(address) => address,
                    Err(err) => {
                        tracing::warn!(domain = %self.domain_id, %err, "resourceIDToHandlerAddress call failed, skipping log");
                        continue;
                    }
                };
                let decoder = match self.registry.resolve(handler_address) {
                    Ok(decoder) => decoder,
                    Err(err) => {
                        tracing::warn!(domain = %self.domain_id, %err, "no source handler registered, skipping log");
                        continue;
                    }
                };
                match decoder.decode(
                    self.domain_id,
                    destination,
                    log.depositNonce,
                    resource_id,
                    &log.data,
                ) {
                    Ok(message) => {
                        if tx.send(message).await.is_err() {
                            tracing::info!(domain = %self.domain_id, "router channel closed, stopping poller");
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(domain = %self.domain_id, block = current, %err, "dropping malformed deposit");
                    }
                }
            }

            if let Err(err) = self.block_store.store_block(self.domain_id, current).await {
                tracing::warn!(domain = %self.domain_id, block = current, %err, "failed to persist block checkpoint");
            }
            cursor = Some(current + 1);
        }
    }
}
