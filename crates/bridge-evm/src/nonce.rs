use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use alloy_provider::Provider;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::sleep;

use crate::error::ChainClientError;

const NONE: u64 = u64::MAX;
const NONCE_PROBE_RETRIES: usize = 10;
const NONCE_PROBE_INTERVAL: Duration = Duration::from_secs(1);

/// Per-address nonce cursor, shared across every transactor writing to one chain.
///
/// Unlike Alloy's own [`NonceManager`](alloy_provider::fillers::NonceManager),
/// the lock/read/increment/unlock steps stay visible to the caller: a
/// transactor holds the lock for the whole build-sign-send sequence of one
/// transaction, not just for the instant the nonce value is read, so two
/// concurrent writers to the same chain can never race for the same nonce.
#[derive(Clone, Debug, Default)]
pub struct NonceCache {
    nonces: Arc<DashMap<Address, Arc<Mutex<u64>>>>,
}

impl NonceCache {
    /// Acquire the lock for `address`. Held until the returned [`NonceHandle`]
    /// is dropped; callers read with `unsafe_nonce`, send their transaction,
    /// then call `unsafe_increase_nonce` before letting the handle go.
    pub async fn lock_nonce(&self, address: Address) -> NonceHandle {
        let cell = {
            let entry = self
                .nonces
                .entry(address)
                .or_insert_with(|| Arc::new(Mutex::new(NONE)));
            Arc::clone(entry.value())
        };
        let guard = cell.lock_owned().await;
        NonceHandle { address, guard }
    }

    /// Drop the cached value for `address`, forcing the next lock holder to
    /// re-probe the chain. Called after a transaction fails to land, since the
    /// on-chain state can no longer be inferred from the local counter.
    pub async fn reset_nonce(&self, address: Address) {
        if let Some(cell) = self.nonces.get(&address) {
            let mut n = cell.lock().await;
            *n = NONE;
            tracing::debug!(%address, "nonce cache reset, will re-probe on next use");
        }
    }

    /// Best-effort read of the cached cursor for `address`, without joining
    /// the lock queue. Returns `None` if nothing has been cached yet or the
    /// lock is currently held by an in-flight send. For reporting only (e.g.
    /// a health endpoint); never use this value to build a transaction.
    pub fn peek_nonce(&self, address: Address) -> Option<u64> {
        let cell = self.nonces.get(&address)?;
        let guard = cell.try_lock().ok()?;
        if *guard == NONE { None } else { Some(*guard) }
    }
}

/// A held nonce lock for one address.
///
/// "unsafe" in `unsafe_nonce`/`unsafe_increase_nonce` means "only valid
/// while the caller holds this handle", not memory unsafety. Dropping the
/// handle is the unlock.
pub struct NonceHandle {
    address: Address,
    guard: OwnedMutexGuard<u64>,
}

impl NonceHandle {
    /// Current nonce for this address, probing the chain's pending nonce on
    /// first use (or after a reset) with a bounded retry budget.
    pub async fn unsafe_nonce<P>(&mut self, provider: &P) -> Result<u64, ChainClientError>
    where
        P: Provider,
    {
        if *self.guard == NONE {
            let mut attempt = 0;
            loop {
                match provider.get_transaction_count(self.address).pending().await {
                    Ok(n) => {
                        *self.guard = n;
                        break;
                    }
                    Err(err) if attempt + 1 < NONCE_PROBE_RETRIES => {
                        attempt += 1;
                        tracing::warn!(
                            address = %self.address,
                            attempt,
                            %err,
                            "pending nonce probe failed, retrying"
                        );
                        sleep(NONCE_PROBE_INTERVAL).await;
                    }
                    Err(_) => return Err(ChainClientError::NonceUnavailable),
                }
            }
        }
        Ok(*self.guard)
    }

    /// Advance the cursor after a successful send. Must only be called once
    /// per held lock, after `unsafe_nonce` has resolved a real value.
    pub fn unsafe_increase_nonce(&mut self) {
        if *self.guard != NONE {
            *self.guard += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn two_addresses_get_independent_locks() {
        let cache = NonceCache::default();
        let a = Address::with_last_byte(1);
        let b = Address::with_last_byte(2);
        let ha = cache.lock_nonce(a).await;
        let hb = cache.lock_nonce(b).await;
        assert_eq!(*ha.guard, NONE);
        assert_eq!(*hb.guard, NONE);
    }

    #[tokio::test]
    async fn increase_is_a_noop_before_the_nonce_is_resolved() {
        let cache = NonceCache::default();
        let addr = Address::with_last_byte(7);
        let mut handle = cache.lock_nonce(addr).await;
        handle.unsafe_increase_nonce();
        assert_eq!(*handle.guard, NONE);
    }
}
