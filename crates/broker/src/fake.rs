// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake broker adapters for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::BrokerError;
use crate::record::{BrokerEvent, DeliveryReport, Record, TopicMetadata};
use crate::traits::{ConsumerAdapter, ProducerAdapter};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const FAKE_TOPIC: &str = "fake-topic";
const CHANNEL_CAPACITY: usize = 256;

/// Scripted outcome for one `read_next` call
#[derive(Debug, Clone)]
enum ReadOutcome {
    Record(Record),
    Nil,
    Error(BrokerError),
}

/// Fake consumer with scripted reads and recorded calls
pub struct FakeConsumerAdapter {
    script: Arc<Mutex<VecDeque<ReadOutcome>>>,
    subscriptions: Arc<Mutex<Vec<String>>>,
    commits: Arc<Mutex<Vec<i64>>>,
    subscribe_error: Arc<Mutex<Option<String>>>,
    commit_error: Arc<Mutex<Option<String>>>,
    first_interaction: Arc<Mutex<Option<Instant>>>,
    next_offset: AtomicI64,
    closed: AtomicBool,
}

impl Default for FakeConsumerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeConsumerAdapter {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            commits: Arc::new(Mutex::new(Vec::new())),
            subscribe_error: Arc::new(Mutex::new(None)),
            commit_error: Arc::new(Mutex::new(None)),
            first_interaction: Arc::new(Mutex::new(None)),
            next_offset: AtomicI64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Queue a record for a future read
    pub fn push_record(&self, key: &[u8], payload: &[u8]) {
        let offset = self.next_offset.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(ReadOutcome::Record(Record {
                topic: FAKE_TOPIC.to_string(),
                partition: 0,
                offset,
                key: key.to_vec(),
                payload: payload.to_vec(),
            }));
    }

    /// Queue an anomalous empty delivery (`Ok(None)`)
    pub fn push_nil(&self) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(ReadOutcome::Nil);
    }

    /// Queue a read error
    pub fn push_read_error(&self, error: BrokerError) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(ReadOutcome::Error(error));
    }

    /// Make the next subscribe call fail
    pub fn fail_subscribe(&self, reason: &str) {
        *self
            .subscribe_error
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }

    /// Make every commit call fail
    pub fn fail_commits(&self, reason: &str) {
        *self.commit_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }

    /// Topics passed to subscribe
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Offsets committed so far
    pub fn commits(&self) -> Vec<i64> {
        self.commits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Timestamp of the first subscribe or read, if any happened
    pub fn first_interaction(&self) -> Option<Instant> {
        *self
            .first_interaction
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn mark_interaction(&self) {
        let mut first = self
            .first_interaction
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if first.is_none() {
            *first = Some(Instant::now());
        }
    }
}

#[async_trait]
impl ConsumerAdapter for FakeConsumerAdapter {
    async fn subscribe(&self, topic: &str) -> Result<(), BrokerError> {
        self.mark_interaction();
        if let Some(reason) = self
            .subscribe_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(BrokerError::Subscribe {
                topic: topic.to_string(),
                reason,
            });
        }
        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(topic.to_string());
        Ok(())
    }

    async fn read_next(&self, timeout: Duration) -> Result<Option<Record>, BrokerError> {
        self.mark_interaction();
        let outcome = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match outcome {
            Some(ReadOutcome::Record(record)) => Ok(Some(record)),
            Some(ReadOutcome::Nil) => Ok(None),
            Some(ReadOutcome::Error(error)) => Err(error),
            None => {
                // Exhausted script behaves like a quiet topic.
                tokio::time::sleep(timeout).await;
                Err(BrokerError::Timeout)
            }
        }
    }

    async fn commit(&self, record: &Record) -> Result<(), BrokerError> {
        if let Some(reason) = self
            .commit_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(BrokerError::Commit(reason));
        }
        self.commits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.offset);
        Ok(())
    }

    async fn metadata(&self, topic: &str, _timeout: Duration) -> Result<TopicMetadata, BrokerError> {
        Ok(TopicMetadata {
            topic: topic.to_string(),
            partitions: 1,
        })
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Fake producer recording produces and emitting scripted delivery reports
pub struct FakeProducerAdapter {
    produced: Arc<Mutex<Vec<(Vec<u8>, Vec<u8>)>>>,
    produce_errors: Arc<Mutex<VecDeque<BrokerError>>>,
    delivery_failures: Arc<Mutex<VecDeque<String>>>,
    reports_tx: mpsc::Sender<DeliveryReport>,
    reports_rx: Mutex<Option<mpsc::Receiver<DeliveryReport>>>,
    events_tx: mpsc::Sender<BrokerEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<BrokerEvent>>>,
    flush_calls: Arc<Mutex<Vec<Duration>>>,
    first_interaction: Arc<Mutex<Option<Instant>>>,
    next_offset: AtomicI64,
    closed: AtomicBool,
}

impl Default for FakeProducerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProducerAdapter {
    pub fn new() -> Self {
        let (reports_tx, reports_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            produced: Arc::new(Mutex::new(Vec::new())),
            produce_errors: Arc::new(Mutex::new(VecDeque::new())),
            delivery_failures: Arc::new(Mutex::new(VecDeque::new())),
            reports_tx,
            reports_rx: Mutex::new(Some(reports_rx)),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            flush_calls: Arc::new(Mutex::new(Vec::new())),
            first_interaction: Arc::new(Mutex::new(None)),
            next_offset: AtomicI64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// A producer whose dedicated delivery channel is absent, forcing
    /// reports onto the generic event channel
    pub fn without_delivery_reports() -> Self {
        let fake = Self::new();
        drop(
            fake.reports_rx
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .take(),
        );
        fake
    }

    /// Make the next produce call fail synchronously
    pub fn fail_next_produce(&self, error: BrokerError) {
        self.produce_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }

    /// Make the next accepted record's delivery report carry an error
    pub fn fail_next_delivery(&self, reason: &str) {
        self.delivery_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reason.to_string());
    }

    /// Inject a broker-level event on the fallback channel
    pub fn push_event(&self, event: BrokerEvent) {
        let _ = self.events_tx.try_send(event);
    }

    /// Records accepted for dispatch, as (key, payload) pairs
    pub fn produced(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.produced
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Timeouts passed to flush
    pub fn flush_calls(&self) -> Vec<Duration> {
        self.flush_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Timestamp of the first produce, if any happened
    pub fn first_interaction(&self) -> Option<Instant> {
        *self
            .first_interaction
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProducerAdapter for FakeProducerAdapter {
    async fn produce(&self, key: Vec<u8>, payload: Vec<u8>) -> Result<(), BrokerError> {
        {
            let mut first = self
                .first_interaction
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if first.is_none() {
                *first = Some(Instant::now());
            }
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }
        if let Some(error) = self
            .produce_errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return Err(error);
        }

        self.produced
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((key.clone(), payload));

        let failure = self
            .delivery_failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let report = DeliveryReport {
            topic: FAKE_TOPIC.to_string(),
            partition: 0,
            offset: self.next_offset.fetch_add(1, Ordering::SeqCst),
            key,
            error: failure.map(BrokerError::Produce),
        };

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

    async fn flush(&self, timeout: Duration) -> usize {
        self.flush_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(timeout);
        0
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
