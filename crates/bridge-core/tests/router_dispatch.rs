use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_core::{RelayerCore, VoterError, WriterChain};
use bridge_types::{DomainId, Message, Payload, ResourceId};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct StubWriter {
    domain: DomainId,
    received: Arc<Mutex<Vec<Message>>>,
    fail: bool,
}

#[async_trait]
impl WriterChain for StubWriter {
    fn domain_id(&self) -> DomainId {
        self.domain
    }

    async fn write(&self, message: Message) -> Result<(), VoterError> {
        if self.fail {
            return Err(VoterError::HandlerResolution("stub failure".into()));
        }
        self.received.lock().unwrap().push(message);
        Ok(())
    }
}

fn message(source: DomainId, destination: DomainId, nonce: u64) -> Message {
    Message::new(
        source,
        destination,
        nonce,
        ResourceId::new([3u8; 32]),
        Payload::Fungible {
            amount: [0u8; 32],
            recipient: vec![0xEE; 20],
        },
    )
}

/// A fan-in of several domains' messages must each land on the writer
/// registered for its own destination, never cross-wired to another chain.
#[tokio::test]
async fn dispatches_each_message_to_its_own_destination_writer() {
    let chain_two = Arc::new(Mutex::new(Vec::new()));
    let chain_three = Arc::new(Mutex::new(Vec::new()));

    let mut registry: HashMap<DomainId, Arc<dyn WriterChain>> = HashMap::new();
    registry.insert(
        DomainId::new(2),
        Arc::new(StubWriter {
            domain: DomainId::new(2),
            received: chain_two.clone(),
            fail: false,
        }),
    );
    registry.insert(
        DomainId::new(3),
        Arc::new(StubWriter {
            domain: DomainId::new(3),
            received: chain_three.clone(),
            fail: false,
        }),
    );

    let core = RelayerCore::new(registry, None);
    let (tx, rx) = mpsc::channel(8);
    tx.send(message(DomainId::new(1), DomainId::new(2), 1)).await.unwrap();
    tx.send(message(DomainId::new(1), DomainId::new(3), 2)).await.unwrap();
    tx.send(message(DomainId::new(1), DomainId::new(2), 3)).await.unwrap();
    drop(tx);

    core.run(rx, CancellationToken::new()).await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    let two = chain_two.lock().unwrap();
    let three = chain_three.lock().unwrap();
    assert_eq!(two.len(), 2);
    assert_eq!(three.len(), 1);
    assert!(two.iter().all(|m| m.destination == DomainId::new(2)));
    assert_eq!(three[0].destination, DomainId::new(3));
}

/// One destination erroring on every write must not starve delivery to an
/// unrelated, healthy destination fed by the same channel.
#[tokio::test]
async fn a_failing_destination_does_not_block_a_healthy_one() {
    let healthy = Arc::new(Mutex::new(Vec::new()));

    let mut registry: HashMap<DomainId, Arc<dyn WriterChain>> = HashMap::new();
    registry.insert(
        DomainId::new(5),
        Arc::new(StubWriter {
            domain: DomainId::new(5),
            received: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }),
    );
    registry.insert(
        DomainId::new(6),
        Arc::new(StubWriter {
            domain: DomainId::new(6),
            received: healthy.clone(),
            fail: false,
        }),
    );

    let core = RelayerCore::new(registry, None);
    let (tx, rx) = mpsc::channel(8);
    tx.send(message(DomainId::new(1), DomainId::new(5), 1)).await.unwrap();
    tx.send(message(DomainId::new(1), DomainId::new(6), 2)).await.unwrap();
    drop(tx);

    core.run(rx, CancellationToken::new()).await;
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(healthy.lock().unwrap().len(), 1);
}
