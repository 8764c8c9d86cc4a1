use alloy_primitives::{Address, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use bridge_evm::{EvmChainClient, IBridge};
use bridge_handlers::DestHandlerRegistry;
use bridge_types::{DomainId, Message};

use crate::error::VoterError;
use crate::metrics::RelayMetrics;
use crate::transactor::Transactor;

/// Destination-side endpoint of one chain: resolves the handler for a
/// routed message's resource, builds the proposal, and submits
/// `voteProposal` through its [`Transactor`].
pub struct Voter {
    domain_id: DomainId,
    bridge_address: Address,
    registry: DestHandlerRegistry,
    transactor: Transactor,
    metrics: Option<std::sync::Arc<dyn RelayMetrics>>,
}

impl Voter {
    pub fn new(
        domain_id: DomainId,
        bridge_address: Address,
        registry: DestHandlerRegistry,
        transactor: Transactor,
        metrics: Option<std::sync::Arc<dyn RelayMetrics>>,
    ) -> Self {
        Self {
            domain_id,
            bridge_address,
            registry,
            transactor,
            metrics,
        }
    }

    pub fn domain_id(&self) -> DomainId {
        self.domain_id
    }

    pub async fn vote_proposal(&self, message: &Message) -> Result<(), VoterError> {
        let client = self.transactor.client();
        let resource_id = B256::from(*message.resource_id.as_bytes());

        let handler_address = client
            .bridge(self.bridge_address)
            .resourceIDToHandlerAddress(resource_id)
            .call()
            .await
            .map_err(|err| VoterError::HandlerResolution(err.to_string()))?;

        let builder = self.registry.resolve(handler_address)?;
        let proposal = builder.build(message, handler_address, self.bridge_address)?;

        let calldata = IBridge::voteProposalCall {
            chainID: message.source.0,
            depositNonce: message.deposit_nonce,
            resourceID: resource_id,
            data: proposal.data.clone().into(),
        }
        .abi_encode();

        let tx_hash = self
            .transactor
            .execute(self.bridge_address, calldata.into())
            .await?;

        if let Some(metrics) = &self.metrics {
            metrics.record_vote(self.domain_id, message.deposit_nonce);
        }
        tracing::info!(
            %tx_hash,
            deposit_nonce = message.deposit_nonce,
            source = %message.source,
            destination = %self.domain_id,
            "submitted voteProposal"
        );
        Ok(())
    }
}

/// Routing-side interface a [`crate::router::RelayerCore`] dispatches onto.
/// EVM chains implement it via [`Voter::vote_proposal`]; the name matches the
/// original bridge's `WriterChain.write`, kept distinct from `vote_proposal`
/// because a future non-EVM chain would implement `write` without voting.
#[async_trait]
pub trait WriterChain: Send + Sync {
    fn domain_id(&self) -> DomainId;
    async fn write(&self, message: Message) -> Result<(), VoterError>;
}

#[async_trait]
impl WriterChain for Voter {
    fn domain_id(&self) -> DomainId {
        self.domain_id
    }

    async fn write(&self, message: Message) -> Result<(), VoterError> {
        self.vote_proposal(&message).await
    }
}
