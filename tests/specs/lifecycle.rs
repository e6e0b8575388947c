//! Job lifecycle through the runner and registry

use crate::prelude::{bounded_consumer, eventually, finite_producer};
use sb_broker::LoopbackBroker;
use sb_core::BrokerConfig;
use sb_engine::{ConsumerEngine, ExecutionRegistry, ProducerEngine, Runner};
use sb_workloads::{EntityConsumerPlugin, EntityProducerPlugin};
use std::time::Duration;

#[tokio::test]
async fn jobs_run_to_completion_and_deregister() {
    let broker = LoopbackBroker::new();
    let config = BrokerConfig::default();
    let registry = ExecutionRegistry::new();
    let runner = Runner::new(registry.clone());

    let consumer = ConsumerEngine::new(
        broker.consumer(&config.group),
        config.clone(),
        EntityConsumerPlugin::new(bounded_consumer(Duration::from_secs(2))),
        4,
    );
    runner.start(consumer).await;

    let producer = ProducerEngine::new(
        broker.producer(&config.topic),
        config.clone(),
        EntityProducerPlugin::new(finite_producer(2, 6)),
        4,
    );
    runner.start(producer).await;

    assert_eq!(registry.len(), 2);

    let drained = registry.clone();
    eventually(move || drained.is_empty()).await;
    assert_eq!(broker.topic_len(&config.topic), 6);
}

#[tokio::test]
async fn closing_through_the_registry_stops_a_job() {
    let broker = LoopbackBroker::new();
    let config = BrokerConfig::default();
    let registry = ExecutionRegistry::new();
    let runner = Runner::new(registry.clone());

    // No run deadline: this job only stops when cancelled.
    let consumer = ConsumerEngine::new(
        broker.consumer(&config.group),
        config.clone(),
        EntityConsumerPlugin::new(bounded_consumer(Duration::ZERO)),
        4,
    );
    runner.start(consumer).await;
    let ids = registry.list();
    assert_eq!(ids.len(), 1);

    registry.close(&ids[0]);

    let drained = registry.clone();
    eventually(move || drained.is_empty()).await;
}
