//! Producer-to-consumer round trips over the loopback broker

use crate::prelude::{bounded_consumer, finite_producer};
use sb_broker::LoopbackBroker;
use sb_core::{BrokerConfig, CancelToken};
use sb_engine::{content_key, ConsumerEngine, ProducerEngine};
use sb_workloads::{EntityConsumerPlugin, EntityProducerPlugin, Payload};
use std::sync::Arc;
use std::time::Duration;

fn manual_commit_config() -> BrokerConfig {
    let mut config = BrokerConfig::default();
    config.consumer.auto_commit_enabled = false;
    config
}

#[tokio::test]
async fn produced_payloads_reach_the_consumer() {
    let broker = LoopbackBroker::new();
    let config = manual_commit_config();

    let producer = ProducerEngine::new(
        broker.producer(&config.topic),
        config.clone(),
        EntityProducerPlugin::new(finite_producer(3, 10)),
        4,
    );
    producer.run(&CancelToken::new()).await.unwrap();
    assert_eq!(producer.submitted_count(), 10);
    assert_eq!(broker.topic_len(&config.topic), 10);

    let first = broker.get(&config.topic, 0).unwrap();
    let payload: Payload = serde_json::from_slice(&first.payload).unwrap();
    assert_eq!(payload.entity_id, "entity-0");
    assert_eq!(payload.attributes.len(), 2);

    // Delivery reports land asynchronously on the listener task.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(producer.plugin().delivered_count(), 10);
    producer.close().await;

    let loopback_consumer = Arc::new(broker.consumer(&config.group));
    let consumer = ConsumerEngine::new(
        loopback_consumer.clone(),
        config.clone(),
        EntityConsumerPlugin::new(bounded_consumer(Duration::from_secs(1))),
        4,
    );
    consumer.run(&CancelToken::new()).await.unwrap();

    assert_eq!(consumer.processed_count(), 10);
    // Three entities cycle through ten payloads.
    assert_eq!(consumer.plugin().entity_count(), 3);
    assert!(consumer.plugin().entity("entity-0").is_some());
    // Explicit commits advanced to the last record.
    assert_eq!(loopback_consumer.committed(), Some(9));
    consumer.close().await;
}

#[tokio::test]
async fn record_keys_survive_the_round_trip() {
    let broker = LoopbackBroker::new();
    let config = BrokerConfig::default();

    let producer = ProducerEngine::new(
        broker.producer(&config.topic),
        config.clone(),
        EntityProducerPlugin::new(finite_producer(2, 4)),
        4,
    );
    producer.run(&CancelToken::new()).await.unwrap();
    producer.close().await;

    let consumer_adapter = Arc::new(broker.consumer(&config.group));
    let consumer = ConsumerEngine::new(
        consumer_adapter.clone(),
        config.clone(),
        EntityConsumerPlugin::new(bounded_consumer(Duration::from_millis(500))),
        4,
    );

    let token = CancelToken::new();
    consumer.run(&token).await.unwrap();
    assert_eq!(consumer.processed_count(), 4);

    // Every stored record's key is the digest of its payload bytes.
    for offset in 0..4usize {
        let record = broker.get(&config.topic, offset).unwrap();
        assert_eq!(record.key, content_key(&record.payload));
    }
}
