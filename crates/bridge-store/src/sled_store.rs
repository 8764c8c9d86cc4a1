use std::path::Path;

use bridge_types::DomainId;

use crate::{BlockStore, BlockStoreError};

/// `sled`-backed block store. Keys are `"block:" ‖ u8(domainID)`, values are
/// big-endian `u64` heights.
pub struct SledBlockStore {
    db: sled::Db,
}

impl SledBlockStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BlockStoreError> {
        let db = sled::open(path).map_err(|e| BlockStoreError::Backend(e.to_string()))?;
        Ok(Self { db })
    }

    fn key(domain: DomainId) -> [u8; 7] {
        let mut key = [0u8; 7];
        key[..6].copy_from_slice(b"block:");
        key[6] = domain.0;
        key
    }
}

#[async_trait::async_trait]
impl BlockStore for SledBlockStore {
    async fn store_block(&self, domain: DomainId, height: u64) -> Result<(), BlockStoreError> {
        self.db
            .insert(Self::key(domain), &height.to_be_bytes())
            .map_err(|e| BlockStoreError::Backend(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| BlockStoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn last_block(&self, domain: DomainId) -> Result<Option<u64>, BlockStoreError> {
        let raw = self
            .db
            .get(Self::key(domain))
            .map_err(|e| BlockStoreError::Backend(e.to_string()))?;
        Ok(raw.map(|bytes| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[..8]);
            u64::from_be_bytes(buf)
        }))
    }
}
