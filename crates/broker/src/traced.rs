// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability
//!
//! Observability is a side channel: the wrappers log and time calls but
//! never alter control flow or mask errors.

use crate::error::BrokerError;
use crate::record::{BrokerEvent, DeliveryReport, Record, TopicMetadata};
use crate::traits::{ConsumerAdapter, ProducerAdapter};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Wrapper that adds tracing to any ConsumerAdapter
pub struct TracedConsumerAdapter<C> {
    inner: C,
}

impl<C> TracedConsumerAdapter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ConsumerAdapter> ConsumerAdapter for TracedConsumerAdapter<C> {
    async fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        let span = tracing::info_span!("broker.subscribe", topic);
        let result = self.inner.subscribe(topic).instrument(span.clone()).await;
        span.in_scope(|| match &result {
            Ok(()) => tracing::info!("subscribed"),
            Err(e) => tracing::error!(error = %e, "subscribe failed"),
        });
        result
    }

    async fn read_next(&self, timeout: Duration) -> Result<Option<Record>, BrokerError> {
        let result = self.inner.read_next(timeout).await;
        match &result {
            Ok(Some(record)) => tracing::trace!(
                partition = record.partition,
                offset = record.offset,
                "record read"
            ),
            Ok(None) => tracing::trace!("empty delivery"),
            // Quiet polls are routine; anything else is worth a line.
            Err(e) if e.is_timeout() => {}
            Err(e) => tracing::debug!(error = %e, "read failed"),
        }
        result
    }

    async fn commit(&self, record: &Record) -> Result<(), BrokerError> {
        let result = self.inner.commit(record).await;
        match &result {
            Ok(()) => tracing::trace!(offset = record.offset, "committed"),
            Err(e) => tracing::warn!(offset = record.offset, error = %e, "commit failed"),
        }
        result
    }

    async fn metadata(&self, topic: &str, timeout: Duration) -> Result<TopicMetadata, BrokerError> {
        let span = tracing::debug_span!("broker.metadata", topic);
        self.inner.metadata(topic, timeout).instrument(span).await
    }

    async fn close(&self) {
        self.inner.close().await;
        tracing::info!("consumer adapter closed");
    }
}

/// Wrapper that adds tracing to any ProducerAdapter
pub struct TracedProducerAdapter<P> {
    inner: P,
}

impl<P> TracedProducerAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProducerAdapter> ProducerAdapter for TracedProducerAdapter<P> {
    async fn produce(&self, key: Vec<u8>, payload: Vec<u8>) -> Result<(), BrokerError> {
        let payload_len = payload.len();
        let result = self.inner.produce(key, payload).await;
        match &result {
            Ok(()) => tracing::trace!(payload_len, "produced"),
            Err(e) => tracing::debug!(payload_len, error = %e, "produce failed"),
        }
        result
    }

    fn take_delivery_reports(&self) -> Option<mpsc::Receiver<DeliveryReport>> {
        self.inner.take_delivery_reports()
    }

    fn take_events(&self) -> Option<mpsc::Receiver<BrokerEvent>> {
        self.inner.take_events()
    }

    async fn flush(&self, timeout: Duration) -> usize {
        let span = tracing::info_span!("broker.flush", timeout_ms = timeout.as_millis() as u64);

        let start = std::time::Instant::now();
        let outstanding = self.inner.flush(timeout).instrument(span.clone()).await;
        span.in_scope(|| {
            tracing::info!(
                outstanding,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "flushed"
            );
        });
        outstanding
    }

    async fn close(&self) {
        self.inner.close().await;
        tracing::info!("producer adapter closed");
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
