use std::collections::HashMap;
use std::sync::Arc;

use bridge_types::{DomainId, Message};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::metrics::RelayMetrics;
use crate::voter::WriterChain;

/// Fans in every domain's poller output and routes each message to the
/// chain identified by its destination domain.
///
/// Routing is fire-and-forget: a slow or stuck destination blocks only the
/// spawned task handling that one message, never the main receive loop, so
/// one congested chain cannot stall delivery to every other chain.
pub struct RelayerCore {
    registry: HashMap<DomainId, Arc<dyn WriterChain>>,
    metrics: Option<Arc<dyn RelayMetrics>>,
}

impl RelayerCore {
    pub fn new(
        registry: HashMap<DomainId, Arc<dyn WriterChain>>,
        metrics: Option<Arc<dyn RelayMetrics>>,
    ) -> Self {
        Self { registry, metrics }
    }

    /// Drain `rx` until it closes or `cancellation` fires.
    pub async fn run(&self, mut rx: mpsc::Receiver<Message>, cancellation: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    tracing::info!("router received shutdown signal");
                    return;
                }
                received = rx.recv() => {
                    match received {
                        Some(message) => {
                            let writer = self.registry.get(&message.destination).cloned();
                            let metrics = self.metrics.clone();
                            tokio::spawn(Self::route(writer, metrics, message));
                        }
                        None => {
                            tracing::info!("all pollers have exited, router shutting down");
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn route(
        writer: Option<Arc<dyn WriterChain>>,
        metrics: Option<Arc<dyn RelayMetrics>>,
        message: Message,
    ) {
        let Some(writer) = writer else {
            tracing::warn!(destination = %message.destination, "no resolver for destination domain, dropping message");
            if let Some(metrics) = &metrics {
                metrics.record_drop(message.destination, "unknown_destination");
            }
            return;
        };

        if let Some(metrics) = &metrics {
            metrics.record_deposit(message.source, message.destination);
        }

        if let Err(err) = writer.write(message.clone()).await {
            tracing::warn!(destination = %message.destination, %err, "write failed, dropping message");
            if let Some(metrics) = &metrics {
                metrics.record_drop(message.destination, "write_error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bridge_types::{Payload, ResourceId};

    use crate::error::VoterError;

    struct RecordingWriter {
        domain: DomainId,
        received: Arc<StdMutex<Vec<Message>>>,
        fail: bool,
    }

    #[async_trait]
    impl WriterChain for RecordingWriter {
        fn domain_id(&self) -> DomainId {
            self.domain
        }

        async fn write(&self, message: Message) -> Result<(), VoterError> {
            if self.fail {
                return Err(VoterError::HandlerResolution("forced failure".into()));
            }
            self.received.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn sample_message(destination: DomainId) -> Message {
        Message::new(
            DomainId::new(1),
            destination,
            7,
            ResourceId::new([1u8; 32]),
            Payload::Fungible {
                amount: [0u8; 32],
                recipient: vec![0xCC; 20],
            },
        )
    }

    #[tokio::test]
    async fn routes_message_to_registered_destination() {
        let received = Arc::new(StdMutex::new(Vec::new()));
        let writer = Arc::new(RecordingWriter {
            domain: DomainId::new(2),
            received: received.clone(),
            fail: false,
        });
        let mut registry: HashMap<DomainId, Arc<dyn WriterChain>> = HashMap::new();
        registry.insert(DomainId::new(2), writer);

        let core = RelayerCore::new(registry, None);
        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_message(DomainId::new(2))).await.unwrap();
        drop(tx);

        core.run(rx, CancellationToken::new()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn drops_message_with_no_registered_destination() {
        let core = RelayerCore::new(HashMap::new(), None);
        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_message(DomainId::new(9))).await.unwrap();
        drop(tx);

        // No writer registered for domain 9: run must return without panicking.
        core.run(rx, CancellationToken::new()).await;
    }

    #[tokio::test]
    async fn write_failure_does_not_stop_the_router() {
        let writer = Arc::new(RecordingWriter {
            domain: DomainId::new(2),
            received: Arc::new(StdMutex::new(Vec::new())),
            fail: true,
        });
        let mut registry: HashMap<DomainId, Arc<dyn WriterChain>> = HashMap::new();
        registry.insert(DomainId::new(2), writer);

        let core = RelayerCore::new(registry, None);
        let (tx, rx) = mpsc::channel(4);
        tx.send(sample_message(DomainId::new(2))).await.unwrap();
        tx.send(sample_message(DomainId::new(2))).await.unwrap();
        drop(tx);

        core.run(rx, CancellationToken::new()).await;
    }

    #[tokio::test]
    async fn cancellation_stops_the_router_even_with_pending_messages() {
        let core = RelayerCore::new(HashMap::new(), None);
        let (tx, rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        token.cancel();

        // The message is never drained because the token is already cancelled.
        tx.try_send(sample_message(DomainId::new(2))).unwrap();
        core.run(rx, token).await;
    }
}
