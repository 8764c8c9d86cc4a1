use dashmap::DashMap;

use bridge_types::DomainId;

use crate::{BlockStore, BlockStoreError};

/// Process-lifetime block store backed by a [`DashMap`]. Used in tests and as
/// a fallback when no on-disk path is configured.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    heights: DashMap<DomainId, u64>,
}

#[async_trait::async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn store_block(&self, domain: DomainId, height: u64) -> Result<(), BlockStoreError> {
        self.heights.insert(domain, height);
        Ok(())
    }

    async fn last_block(&self, domain: DomainId) -> Result<Option<u64>, BlockStoreError> {
        Ok(self.heights.get(&domain).map(|v| *v))
    }
}
