//! Prometheus-backed [`bridge_core::RelayMetrics`] sink: the concrete
//! backend this binary wires into the relay engine. Unreachable scrape
//! targets are harmless — counters simply accumulate until the next scrape.

use bridge_types::DomainId;
use prometheus::{CounterVec, Opts, Registry};

pub struct PrometheusMetrics {
    registry: Registry,
    deposits_total: CounterVec,
    votes_total: CounterVec,
    drops_total: CounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let deposits_total = CounterVec::new(
            Opts::new("relayer_deposits_total", "Deposit messages routed, by source and destination domain"),
            &["source", "destination"],
        )
        .expect("static metric descriptor");
        let votes_total = CounterVec::new(
            Opts::new("relayer_votes_total", "voteProposal transactions submitted, by destination domain"),
            &["destination"],
        )
        .expect("static metric descriptor");
        let drops_total = CounterVec::new(
            Opts::new("relayer_drops_total", "Messages dropped without a vote, by destination domain and reason"),
            &["destination", "reason"],
        )
        .expect("static metric descriptor");

        registry
            .register(Box::new(deposits_total.clone()))
            .expect("metric name is unique");
        registry
            .register(Box::new(votes_total.clone()))
            .expect("metric name is unique");
        registry
            .register(Box::new(drops_total.clone()))
            .expect("metric name is unique");

        Self {
            registry,
            deposits_total,
            votes_total,
            drops_total,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl bridge_core::RelayMetrics for PrometheusMetrics {
    fn record_deposit(&self, source: DomainId, destination: DomainId) {
        self.deposits_total
            .with_label_values(&[&source.to_string(), &destination.to_string()])
            .inc();
    }

    fn record_vote(&self, destination: DomainId, _deposit_nonce: u64) {
        self.votes_total
            .with_label_values(&[&destination.to_string()])
            .inc();
    }

    fn record_drop(&self, destination: DomainId, reason: &str) {
        self.drops_total
            .with_label_values(&[&destination.to_string(), reason])
            .inc();
    }
}
