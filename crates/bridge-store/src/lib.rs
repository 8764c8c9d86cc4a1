//! Durable mapping `domainID → last-processed block height`.
//!
//! The concrete embedded key-value store is an external collaborator from the
//! relay engine's point of view; this crate only fixes the contract
//! ([`BlockStore`]) and the start-block resolution rule the poller relies on,
//! plus two implementations small enough to ship: an in-memory store for
//! tests, and a [`sled`](sled)-backed store for everything else.

mod memory;
mod sled_store;

pub use memory::InMemoryBlockStore;
pub use sled_store::SledBlockStore;

use bridge_types::DomainId;

#[derive(Debug, thiserror::Error)]
pub enum BlockStoreError {
    #[error("block-store backend error: {0}")]
    Backend(String),
}

/// Durable `domainID → last-processed block height` checkpoint store.
#[async_trait::async_trait]
pub trait BlockStore: Send + Sync {
    /// Record `height` as the last block fully processed for `domain`.
    async fn store_block(&self, domain: DomainId, height: u64) -> Result<(), BlockStoreError>;

    /// Read the persisted height for `domain`, if any.
    async fn last_block(&self, domain: DomainId) -> Result<Option<u64>, BlockStoreError>;
}

/// Resolve the block height a poller should resume from.
///
/// Resolution order:
/// 1. `fresh_start` ignores persisted state and returns `configured_start`.
/// 2. A persisted height for `domain` wins if present.
/// 3. `use_latest_block` asks the poller to substitute the current chain head
///    (signalled here as `None`).
/// 4. Otherwise, fall back to `configured_start`.
pub async fn get_start_block(
    store: &dyn BlockStore,
    domain: DomainId,
    configured_start: Option<u64>,
    use_latest_block: bool,
    fresh_start: bool,
) -> Result<Option<u64>, BlockStoreError> {
    if fresh_start {
        return Ok(configured_start);
    }
    if let Some(persisted) = store.last_block(domain).await? {
        return Ok(Some(persisted));
    }
    if use_latest_block {
        return Ok(None);
    }
    Ok(configured_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_start_ignores_persisted_state() {
        let store = InMemoryBlockStore::default();
        store.store_block(DomainId::new(1), 50).await.unwrap();
        let start = get_start_block(&store, DomainId::new(1), Some(10), false, true)
            .await
            .unwrap();
        assert_eq!(start, Some(10));
    }

    #[tokio::test]
    async fn persisted_height_wins_over_use_latest_and_configured() {
        let store = InMemoryBlockStore::default();
        store.store_block(DomainId::new(1), 50).await.unwrap();
        let start = get_start_block(&store, DomainId::new(1), Some(10), true, false)
            .await
            .unwrap();
        assert_eq!(start, Some(50));
    }

    #[tokio::test]
    async fn use_latest_block_returns_none_sentinel_without_persisted_state() {
        let store = InMemoryBlockStore::default();
        let start = get_start_block(&store, DomainId::new(1), Some(10), true, false)
            .await
            .unwrap();
        assert_eq!(start, None);
    }

    #[tokio::test]
    async fn falls_back_to_configured_start() {
        let store = InMemoryBlockStore::default();
        let start = get_start_block(&store, DomainId::new(1), Some(10), false, false)
            .await
            .unwrap();
        assert_eq!(start, Some(10));
    }

    #[tokio::test]
    async fn missing_entry_and_no_fallback_means_never_processed() {
        let store = InMemoryBlockStore::default();
        let start = get_start_block(&store, DomainId::new(1), None, false, false)
            .await
            .unwrap();
        assert_eq!(start, None);
    }
}
