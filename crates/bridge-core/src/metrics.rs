use bridge_types::DomainId;

/// Optional observability sink. Wiring no sink is a valid, crash-free
/// configuration rather than a trap: callers hold an `Option<Arc<dyn
/// RelayMetrics>>` and check it before every call, so a router built
/// without a metrics backend never dereferences one.
pub trait RelayMetrics: Send + Sync {
    fn record_deposit(&self, source: DomainId, destination: DomainId);
    fn record_vote(&self, destination: DomainId, deposit_nonce: u64);
    fn record_drop(&self, destination: DomainId, reason: &str);
}

#[derive(Debug, Default)]
pub struct NoopMetrics;

impl RelayMetrics for NoopMetrics {
    fn record_deposit(&self, _source: DomainId, _destination: DomainId) {}
    fn record_vote(&self, _destination: DomainId, _deposit_nonce: u64) {}
    fn record_drop(&self, _destination: DomainId, _reason: &str) {}
}
