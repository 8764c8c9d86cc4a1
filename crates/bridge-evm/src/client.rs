use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_provider::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, Identity, JoinFill,
};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::{BlockId, Filter, TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use tower::ServiceBuilder;
use url::Url;

use crate::abi::IBridge;
use crate::error::ChainClientError;
use crate::gas::{Eip1559GasPricer, GasPricer, LegacyGasPricer};
use crate::nonce::{NonceCache, NonceHandle};

const RECEIPT_RETRIES: usize = 50;
const RECEIPT_INTERVAL: Duration = Duration::from_secs(5);

type InnerFiller = JoinFill<GasFiller, JoinFill<BlobGasFiller, ChainIdFiller>>;
/// Gas/chain-id filling only. Nonce is deliberately left out of the filler
/// stack: it is managed explicitly through [`NonceCache`] so a transactor can
/// hold the per-address lock across the whole build-sign-send sequence.
pub type InnerProvider = FillProvider<JoinFill<Identity, InnerFiller>, RootProvider>;

/// Thin facade over one EVM JSON-RPC endpoint.
///
/// Read access (`latest_block`, `fetch_deposit_logs`, contract calls) goes
/// through the filling provider. Writes are deliberately decomposed into
/// `gas_price` / `lock_nonce` / `sign_and_send_transaction` / `wait_for_receipt`
/// so a caller can interleave its own retry and backoff policy instead of
/// getting an opaque all-or-nothing `send`.
pub struct EvmChainClient {
    provider: InnerProvider,
    wallet: EthereumWallet,
    chain_id: Option<u64>,
    eip1559: bool,
    gas_limit_override: Option<u64>,
    nonce_cache: NonceCache,
    gas_pricer: Box<dyn GasPricer>,
    signer_addresses: Arc<Vec<Address>>,
    signer_cursor: AtomicUsize,
}

impl EvmChainClient {
    /// `chain_id`: `None` is tolerated and used as a fallback for networks
    /// whose `eth_chainId` doesn't return one either — the client probes it
    /// once at connect time and otherwise signs without EIP-155 replay
    /// protection rather than failing to start.
    pub async fn connect(
        rpc_urls: &[Url],
        chain_id: Option<u64>,
        signers: Vec<PrivateKeySigner>,
        eip1559: bool,
        gas_limit_override: Option<u64>,
    ) -> Result<Self, ChainClientError> {
        let transports: Vec<_> = rpc_urls
            .iter()
            .map(|url| {
                ServiceBuilder::new()
                    .layer(ThrottleLayer::new(u32::MAX))
                    .service(Http::new(url.clone()))
            })
            .collect();
        let fallback = ServiceBuilder::new()
            .layer(
                FallbackLayer::default().with_active_transport_count(
                    NonZeroUsize::new(transports.len())
                        .ok_or_else(|| ChainClientError::GasPrice("no rpc endpoints configured".into()))?,
                ),
            )
            .service(transports);
        let client = RpcClient::new(fallback, false);

        let filler = JoinFill::new(GasFiller, JoinFill::new(BlobGasFiller::default(), ChainIdFiller::default()));
        let provider: InnerProvider = ProviderBuilder::default().filler(filler).connect_client(client);

        let chain_id = match chain_id {
            Some(id) => Some(id),
            None => provider.get_chain_id().await.ok(),
        };

        let signers: Vec<_> = signers
            .into_iter()
            .map(|s| s.with_chain_id(chain_id))
            .collect();
        let wallet = {
            let mut iter = signers.into_iter();
            let first = iter.next().ok_or(ChainClientError::NoSigners)?;
            let mut wallet = EthereumWallet::from(first);
            for signer in iter {
                wallet.register_signer(signer);
            }
            wallet
        };
        let signer_addresses: Vec<Address> = {
            use alloy_network::NetworkWallet;
            NetworkWallet::<alloy_network::Ethereum>::signer_addresses(&wallet).collect()
        };

        let gas_pricer: Box<dyn GasPricer> = if eip1559 {
            Box::new(Eip1559GasPricer::new(provider.clone()))
        } else {
            Box::new(LegacyGasPricer::new(provider.clone()))
        };

        Ok(Self {
            provider,
            wallet,
            chain_id,
            eip1559,
            gas_limit_override,
            nonce_cache: NonceCache::default(),
            gas_pricer,
            signer_addresses: Arc::new(signer_addresses),
            signer_cursor: AtomicUsize::new(0),
        })
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// The configured signer addresses.
    pub fn signer_addresses(&self) -> &[Address] {
        &self.signer_addresses
    }

    /// Selects the next signer address in round-robin order, distributing
    /// transaction load and nonce contention across every configured key.
    pub fn next_signer_address(&self) -> Address {
        debug_assert!(!self.signer_addresses.is_empty());
        if self.signer_addresses.len() == 1 {
            return self.signer_addresses[0];
        }
        let next = self.signer_cursor.fetch_add(1, Ordering::Relaxed) % self.signer_addresses.len();
        self.signer_addresses[next]
    }

    pub async fn latest_block(&self) -> Result<u64, ChainClientError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Fetch `Deposit` logs emitted by `bridge` in the half-open range `[from, to]`.
    pub async fn fetch_deposit_logs(
        &self,
        bridge: Address,
        from: u64,
        to: u64,
    ) -> Result<Vec<IBridge::Deposit>, ChainClientError> {
        let filter = Filter::new()
            .address(bridge)
            .from_block(from)
            .to_block(to)
            .event_signature(IBridge::Deposit::SIGNATURE_HASH);
        let logs = self.provider.get_logs(&filter).await?;
        Ok(logs
            .into_iter()
            .filter_map(|log| log.log_decode::<IBridge::Deposit>().ok())
            .map(|decoded| decoded.inner.data)
            .collect())
    }

    /// A handle to the bridge contract for read-only view calls
    /// (`resourceIDToHandlerAddress`) and ABI-encoding writes.
    pub fn bridge(&self, address: Address) -> IBridge::IBridgeInstance<&InnerProvider> {
        IBridge::new(address, &self.provider)
    }

    pub async fn gas_price(&self) -> Result<Vec<U256>, ChainClientError> {
        self.gas_pricer.gas_price().await
    }

    /// Acquire the nonce lock for `address`. Held across the full
    /// sign-and-send sequence by the caller.
    pub async fn lock_nonce(&self, address: Address) -> NonceHandle {
        self.nonce_cache.lock_nonce(address).await
    }

    pub async fn reset_nonce(&self, address: Address) {
        self.nonce_cache.reset_nonce(address).await;
    }

    /// Best-effort cached nonce for `address`, for health reporting only.
    pub fn peek_nonce(&self, address: Address) -> Option<u64> {
        self.nonce_cache.peek_nonce(address)
    }

    /// Read the nonce a held lock is pointing at, probing the chain's
    /// pending nonce on first use. Kept on the client (rather than on
    /// [`NonceHandle`] itself) so the handle never needs to know about the
    /// provider.
    pub async fn nonce(&self, handle: &mut NonceHandle) -> Result<u64, ChainClientError> {
        handle.unsafe_nonce(&self.provider).await
    }

    /// Sign `data` as a call to `to` from `from` with the given `nonce`,
    /// always as a legacy transaction (`gasPrice = gas_price[0]`, regardless
    /// of how many prices the configured [`GasPricer`] returned), then
    /// broadcast it. Returns the locally computed transaction hash
    /// immediately; the caller decides separately whether and how long to
    /// wait for a receipt via [`Self::wait_for_receipt`].
    pub async fn sign_and_send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
        nonce: u64,
        gas_price: &[U256],
    ) -> Result<B256, ChainClientError> {
        let mut txr = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data)
            .with_nonce(nonce);
        if let Some(chain_id) = self.chain_id {
            txr = txr.with_chain_id(chain_id);
        }

        if let Some(price) = gas_price.first() {
            txr = txr.with_gas_price(price.to::<u128>());
        }

        let gas_limit = match self.gas_limit_override {
            Some(limit) => limit,
            None => {
                self.provider
                    .estimate_gas(txr.clone())
                    .block(BlockId::pending())
                    .await?
            }
        };
        txr = txr.with_gas_limit(gas_limit);

        let envelope = txr
            .build(&self.wallet)
            .await
            .map_err(|err| ChainClientError::Signer(alloy_signer::Error::other(err.to_string())))?;
        let hash = *envelope.tx_hash();
        self.provider.send_tx_envelope(envelope).await?;
        Ok(hash)
    }

    /// Poll for a receipt, retrying up to the fixed budget. Fails loudly on a
    /// reverted transaction rather than treating `status != 1` as "still pending".
    pub async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, ChainClientError> {
        for attempt in 0..RECEIPT_RETRIES {
            match self.provider.get_transaction_receipt(hash).await? {
                Some(receipt) => {
                    if !receipt.status() {
                        return Err(ChainClientError::TransactionFailed {
                            hash: hash.to_string(),
                            status: 0,
                        });
                    }
                    return Ok(receipt);
                }
                None => {
                    tracing::trace!(%hash, attempt, "receipt not yet available");
                    tokio::time::sleep(RECEIPT_INTERVAL).await;
                }
            }
        }
        Err(ChainClientError::ReceiptTimeout(hash.to_string()))
    }
}
