//! Wires configuration into running chain clients, pollers, voters and the
//! router, then drives the process until a shutdown signal arrives: load
//! `.env`, parse config, build the long-lived state, bind the HTTP listener,
//! and await a `CancellationToken`-driven graceful shutdown.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_signer_local::PrivateKeySigner;
use bridge_core::{EventPoller, RelayerCore, Transactor, Voter, WriterChain};
use bridge_evm::EvmChainClient;
use bridge_handlers::{DestHandlerRegistry, Erc20Decoder, Erc20ProposalBuilder, SourceHandlerRegistry};
use bridge_store::{BlockStore, SledBlockStore, get_start_block};
use bridge_types::DomainId;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use crate::config::{CliArgs, ConfigError, RawConfig};
use crate::health::{ChainHandle, HealthState, routes};
use crate::metrics::PrometheusMetrics;
use crate::signal::SigDown;

/// Number of in-flight messages the router will buffer from all pollers
/// combined before a poller's channel send blocks, giving the router
/// backpressure instead of unbounded memory growth.
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid private key: {0}")]
    PrivateKey(String),
    #[error("failed to open block-store at {0}: {1}")]
    BlockStore(std::path::PathBuf, bridge_store::BlockStoreError),
    #[error("chain '{0}': failed to connect: {1}")]
    ChainConnect(String, bridge_evm::ChainClientError),
    #[error("failed to bind health/metrics listener on {0}: {1}")]
    Bind(std::net::SocketAddr, std::io::Error),
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing();

    let args = CliArgs::parse();
    let raw_config = RawConfig::load(&args.config)?;

    let signer = args
        .private_key
        .parse::<PrivateKeySigner>()
        .map_err(|e| RunError::PrivateKey(e.to_string()))?;
    let signer_address = signer.address();

    let block_store: Arc<dyn BlockStore> = Arc::new(
        SledBlockStore::open(&args.blockstore_path)
            .map_err(|e| RunError::BlockStore(args.blockstore_path.clone(), e))?,
    );

    let metrics = Arc::new(PrometheusMetrics::new());
    let cancellation = SigDown::try_new()?.cancellation_token();

    let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);

    let mut writer_registry: HashMap<DomainId, Arc<dyn WriterChain>> = HashMap::new();
    let mut chain_handles = Vec::with_capacity(raw_config.chains.len());
    let mut poller_tasks = Vec::with_capacity(raw_config.chains.len());

    for chain_cfg in &raw_config.chains {
        let domain_id = DomainId::new(chain_cfg.id);
        let client = Arc::new(
            EvmChainClient::connect(
                &[chain_cfg.endpoint.clone()],
                chain_cfg.chain_id,
                vec![signer.clone()],
                chain_cfg.eip1559,
                chain_cfg.gas_limit,
            )
            .await
            .map_err(|e| RunError::ChainConnect(chain_cfg.name.clone(), e))?,
        );

        let mut source_registry = SourceHandlerRegistry::default();
        source_registry.register(chain_cfg.erc20_handler, Arc::new(Erc20Decoder));
        let source_registry = Arc::new(source_registry);

        let mut dest_registry = DestHandlerRegistry::default();
        dest_registry.register(chain_cfg.erc20_handler, Arc::new(Erc20ProposalBuilder));

        let transactor = Transactor::new(client.clone());
        let voter = Arc::new(Voter::new(
            domain_id,
            chain_cfg.bridge,
            dest_registry,
            transactor,
            Some(metrics.clone()),
        ));
        writer_registry.insert(domain_id, voter.clone() as Arc<dyn WriterChain>);

        let start_block = get_start_block(
            block_store.as_ref(),
            domain_id,
            chain_cfg.start_block,
            chain_cfg.use_latest_block.unwrap_or(args.latest_block),
            chain_cfg.fresh_start.unwrap_or(args.fresh_start),
        )
        .await
        .map_err(|e| RunError::BlockStore(args.blockstore_path.clone(), e))?;

        let poller = EventPoller::new(
            domain_id,
            chain_cfg.bridge,
            client.clone(),
            block_store.clone(),
            source_registry,
            std::time::Duration::from_millis(chain_cfg.block_retry_interval_ms),
            chain_cfg.block_confirmations,
        );
        let poller_tx = tx.clone();
        let poller_cancellation = cancellation.clone();
        poller_tasks.push(tokio::spawn(async move {
            poller.run(start_block, poller_tx, poller_cancellation).await;
        }));

        chain_handles.push(ChainHandle {
            domain_id,
            name: chain_cfg.name.clone(),
            client,
            signer_address,
        });
    }
    drop(tx);

    let health_state = Arc::new(HealthState {
        block_store: block_store.clone(),
        chains: chain_handles,
        metrics: metrics.clone(),
    });
    let listener = tokio::net::TcpListener::bind(args.metrics_addr)
        .await
        .map_err(|e| RunError::Bind(args.metrics_addr, e))?;
    tracing::info!(addr = %args.metrics_addr, "health/metrics endpoint listening");
    let server_cancellation = cancellation.clone();
    let server = tokio::spawn(async move {
        let shutdown = async move { server_cancellation.cancelled().await };
        if let Err(err) = axum::serve(listener, routes(health_state))
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(%err, "health/metrics server exited with an error");
        }
    });

    let router = RelayerCore::new(writer_registry, Some(metrics.clone()));
    router.run(rx, cancellation.clone()).await;

    for task in poller_tasks {
        let _ = task.await;
    }
    let _ = server.await;

    tracing::info!("relayer shut down cleanly");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
