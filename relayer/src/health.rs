//! Minimal health and metrics HTTP surface: per-chain liveness on
//! `/healthz` and a Prometheus text-exposition endpoint on `/metrics`.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bridge_evm::EvmChainClient;
use bridge_store::BlockStore;
use bridge_types::DomainId;
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;

use crate::metrics::PrometheusMetrics;

pub struct ChainHandle {
    pub domain_id: DomainId,
    pub name: String,
    pub client: Arc<EvmChainClient>,
    pub signer_address: Address,
}

pub struct HealthState {
    pub block_store: Arc<dyn BlockStore>,
    pub chains: Vec<ChainHandle>,
    pub metrics: Arc<PrometheusMetrics>,
}

pub fn routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(get_health))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

#[derive(Serialize)]
struct ChainHealth {
    domain: u8,
    name: String,
    last_processed_block: Option<u64>,
    nonce: Option<u64>,
}

#[derive(Serialize)]
struct Health {
    chains: Vec<ChainHealth>,
}

async fn get_health(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let mut chains = Vec::with_capacity(state.chains.len());
    let mut last_blocks: HashMap<DomainId, Option<u64>> = HashMap::new();
    for chain in &state.chains {
        let last_processed_block = match state.block_store.last_block(chain.domain_id).await {
            Ok(height) => height,
            Err(err) => {
                tracing::warn!(domain = %chain.domain_id, %err, "health check: failed to read block-store");
                None
            }
        };
        last_blocks.insert(chain.domain_id, last_processed_block);
        chains.push(ChainHealth {
            domain: chain.domain_id.0,
            name: chain.name.clone(),
            last_processed_block,
            nonce: chain.client.peek_nonce(chain.signer_address),
        });
    }
    Json(Health { chains })
}

async fn get_metrics(State(state): State<Arc<HealthState>>) -> Response {
    let encoder = TextEncoder::new();
    let families = state.metrics.registry().gather();
    let mut buf = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buf) {
        tracing::error!(%err, "failed to encode prometheus metrics");
        return (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response();
    }
    ([(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())], buf).into_response()
}
