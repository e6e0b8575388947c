// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process loopback broker
//!
//! A single-partition, in-memory topic store so the demo binary and the
//! integration tests can run a producer and a consumer end-to-end without an
//! external broker. Not a broker client: no persistence, no groups beyond a
//! per-consumer cursor, no rebalancing.

use crate::error::BrokerError;
use crate::record::{BrokerEvent, DeliveryReport, Record, TopicMetadata};
use crate::traits::{ConsumerAdapter, ProducerAdapter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct StoredRecord {
    key: Vec<u8>,
    payload: Vec<u8>,
}

/// Shared topic store. Clone handles point at the same topics.
#[derive(Clone, Default)]
pub struct LoopbackBroker {
    topics: Arc<Mutex<HashMap<String, Vec<StoredRecord>>>>,
}

impl LoopbackBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer handle bound to one topic
    pub fn producer(&self, topic: impl Into<String>) -> LoopbackProducer {
        let (reports_tx, reports_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        LoopbackProducer {
            broker: self.clone(),
            topic: topic.into(),
            reports_tx,
            reports_rx: Mutex::new(Some(reports_rx)),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            closed: AtomicBool::new(false),
        }
    }

    /// Consumer handle with its own read cursor
    pub fn consumer(&self, group: impl Into<String>) -> LoopbackConsumer {
        LoopbackConsumer {
            broker: self.clone(),
            group: group.into(),
            topic: Mutex::new(None),
            next_offset: AtomicUsize::new(0),
            committed: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of records held for a topic
    pub fn topic_len(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(topic)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn append(&self, topic: &str, record: StoredRecord) -> i64 {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        let records = topics.entry(topic.to_string()).or_default();
        records.push(record);
        (records.len() - 1) as i64
    }

    /// Record stored at an offset, if present
    pub fn get(&self, topic: &str, offset: usize) -> Option<Record> {
        let topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        let stored = topics.get(topic)?.get(offset)?;
        Some(Record {
            topic: topic.to_string(),
            partition: 0,
            offset: offset as i64,
            key: stored.key.clone(),
            payload: stored.payload.clone(),
        })
    }
}

/// Produce side of the loopback broker
pub struct LoopbackProducer {
    broker: LoopbackBroker,
    topic: String,
    reports_tx: mpsc::Sender<DeliveryReport>,
    reports_rx: Mutex<Option<mpsc::Receiver<DeliveryReport>>>,
    events_tx: mpsc::Sender<BrokerEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<BrokerEvent>>>,
    closed: AtomicBool,
}

#[async_trait]
impl ProducerAdapter for LoopbackProducer {
    async fn produce(&self, key: Vec<u8>, payload: Vec<u8>) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }

        let offset = self.broker.append(
            &self.topic,
            StoredRecord {
                key: key.clone(),
                payload,
            },
        );
        let report = DeliveryReport {
            topic: self.topic.clone(),
            partition: 0,
            offset,
            key,
            error: None,
        };

        // The dedicated channel wins; fall back to the generic event stream
        // when nobody took it. A full channel drops the report, matching a
        // real client's bounded delivery queue.
        if let Err(err) = self.reports_tx.try_send(report) {
            let report = match err {
                mpsc::error::TrySendError::Full(r) => r,
                mpsc::error::TrySendError::Closed(r) => r,
            };
            let _ = self.events_tx.try_send(BrokerEvent::Delivery(report));
        }
        Ok(())
    }

    fn take_delivery_reports(&self) -> Option<mpsc::Receiver<DeliveryReport>> {
        self.reports_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    fn take_events(&self) -> Option<mpsc::Receiver<BrokerEvent>> {
        self.events_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    async fn flush(&self, _timeout: Duration) -> usize {
        // Appends are synchronous; nothing is ever in flight.
        0
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Consume side of the loopback broker
pub struct LoopbackConsumer {
    broker: LoopbackBroker,
    #[allow(dead_code)]
    group: String,
    topic: Mutex<Option<String>>,
    next_offset: AtomicUsize,
    committed: Mutex<Option<i64>>,
    closed: AtomicBool,
}

impl LoopbackConsumer {
    /// Highest committed offset, if any
    pub fn committed(&self) -> Option<i64> {
        *self.committed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConsumerAdapter for LoopbackConsumer {
    async fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        let mut subscribed = self.topic.lock().unwrap_or_else(|e| e.into_inner());
        *subscribed = Some(topic.to_string());
        Ok(())
    }

    async fn read_next(&self, timeout: Duration) -> Result<Option<Record>, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        let topic = {
            let subscribed = self.topic.lock().unwrap_or_else(|e| e.into_inner());
            match subscribed.as_ref() {
                Some(topic) => topic.clone(),
                None => {
                    return Err(BrokerError::Disconnected("read before subscribe".to_string()))
                }
            }
        };

        let offset = self.next_offset.load(Ordering::SeqCst);
        if let Some(record) = self.broker.get(&topic, offset) {
            self.next_offset.store(offset + 1, Ordering::SeqCst);
            return Ok(Some(record));
        }

        // Nothing buffered: wait out the poll window once, then give up.
        if !timeout.is_zero() {
            tokio::time::sleep(timeout).await;
            if let Some(record) = self.broker.get(&topic, offset) {
                self.next_offset.store(offset + 1, Ordering::SeqCst);
                return Ok(Some(record));
            }
        }
        Err(BrokerError::Timeout)
    }

    async fn commit(&self, record: &Record) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        let mut committed = self.committed.lock().unwrap_or_else(|e| e.into_inner());
        *committed = Some(record.offset);
        Ok(())
    }

    async fn metadata(&self, topic: &str, _timeout: Duration) -> Result<TopicMetadata, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        Ok(TopicMetadata {
            topic: topic.to_string(),
            partitions: 1,
        })
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "loopback_tests.rs"]
mod tests;
