// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for the broker capability
//!
//! An adapter handle is owned exclusively by one engine instance and is
//! never shared across jobs, so the traits are deliberately not `Clone`.

use crate::error::BrokerError;
use crate::record::{BrokerEvent, DeliveryReport, Record, TopicMetadata};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Consume-side broker capability
#[async_trait]
pub trait ConsumerAdapter: Send + Sync + 'static {
    /// Join the configured group on a topic. Failing to subscribe is fatal
    /// to the run; the engine never enters its loop.
    async fn subscribe(&self, topic: &str) -> Result<(), BrokerError>;

    /// Read one record, waiting at most `timeout`.
    ///
    /// A quiet poll returns `Err(BrokerError::Timeout)`. `Ok(None)` is an
    /// anomalous empty delivery; callers log and skip it.
    async fn read_next(&self, timeout: Duration) -> Result<Option<Record>, BrokerError>;

    /// Commit the record's offset
    async fn commit(&self, record: &Record) -> Result<(), BrokerError>;

    /// Topic metadata lookup, bounded by `timeout`
    async fn metadata(&self, topic: &str, timeout: Duration) -> Result<TopicMetadata, BrokerError>;

    /// Release the underlying client. Further calls fail with `Closed`.
    async fn close(&self);
}

/// Produce-side broker capability
#[async_trait]
pub trait ProducerAdapter: Send + Sync + 'static {
    /// Hand one record to the broker for asynchronous dispatch. Delivery
    /// outcome arrives later on the delivery-report channel.
    async fn produce(&self, key: Vec<u8>, payload: Vec<u8>) -> Result<(), BrokerError>;

    /// Take the dedicated per-producer delivery channel. Yields `Some` at
    /// most once; `None` afterwards, or when the adapter does not wire one.
    fn take_delivery_reports(&self) -> Option<mpsc::Receiver<DeliveryReport>>;

    /// Take the generic event channel (delivery failures and broker-level
    /// errors). Yields `Some` at most once.
    fn take_events(&self) -> Option<mpsc::Receiver<BrokerEvent>>;

    /// Block until in-flight records are delivered or `timeout` elapses.
    /// Returns the number of records still outstanding.
    async fn flush(&self, timeout: Duration) -> usize;

    /// Release the underlying client. Further produces fail with `Closed`.
    async fn close(&self);
}

// An Arc-wrapped adapter is still an adapter; supervisors keep one handle
// while the engine owns another.
#[async_trait]
impl<T: ConsumerAdapter> ConsumerAdapter for Arc<T> {
    async fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        (**self).subscribe(topic).await
    }

    async fn read_next(&self, timeout: Duration) -> Result<Option<Record>, BrokerError> {
        (**self).read_next(timeout).await
    }

    async fn commit(&self, record: &Record) -> Result<(), BrokerError> {
        (**self).commit(record).await
    }

    async fn metadata(&self, topic: &str, timeout: Duration) -> Result<TopicMetadata, BrokerError> {
        (**self).metadata(topic, timeout).await
    }

    async fn close(&self) {
        (**self).close().await
    }
}

#[async_trait]
impl<T: ProducerAdapter> ProducerAdapter for Arc<T> {
    async fn produce(&self, key: Vec<u8>, payload: Vec<u8>) -> Result<(), BrokerError> {
        (**self).produce(key, payload).await
    }

    fn take_delivery_reports(&self) -> Option<mpsc::Receiver<DeliveryReport>> {
        (**self).take_delivery_reports()
    }

    fn take_events(&self) -> Option<mpsc::Receiver<BrokerEvent>> {
        (**self).take_events()
    }

    async fn flush(&self, timeout: Duration) -> usize {
        (**self).flush(timeout).await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
