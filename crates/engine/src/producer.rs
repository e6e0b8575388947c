// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer engine: drains a plugin's payload stream into the broker

use crate::error::EngineError;
use crate::plugin::ProducerPlugin;
use sb_broker::{BrokerEvent, DeliveryReport, ProducerAdapter};
use sb_core::{
    initial_delay, BrokerConfig, CancelToken, IntervalPacer, RunDeadline, DEFAULT_LOG_BATCH_SIZE,
};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a finished run waits for in-flight deliveries before closing
/// out. Only reached when the payload stream ends; cancelled and expired
/// runs skip the flush.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(15);

/// Content-addressed record key: SHA-256 over the serialized payload bytes.
/// Identical payload bytes always land on the same partition.
pub fn content_key(payload: &[u8]) -> Vec<u8> {
    Sha256::digest(payload).to_vec()
}

/// Drives one bounded produce run against a broker adapter.
///
/// Delivery reports and broker events are consumed by supervised listener
/// tasks spawned at run start and stopped by [`ProducerEngine::close`].
pub struct ProducerEngine<A, P> {
    adapter: A,
    config: BrokerConfig,
    plugin: Arc<P>,
    log_batch_size: usize,
    submitted: AtomicU64,
    listener_stop: CancelToken,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl<A, P> ProducerEngine<A, P>
where
    A: ProducerAdapter,
    P: ProducerPlugin,
{
    pub fn new(adapter: A, config: BrokerConfig, plugin: P, log_batch_size: usize) -> Self {
        // Zero would make the batch modulo a division by zero.
        let log_batch_size = if log_batch_size == 0 {
            DEFAULT_LOG_BATCH_SIZE
        } else {
            log_batch_size
        };
        Self {
            adapter,
            config,
            plugin: Arc::new(plugin),
            log_batch_size,
            submitted: AtomicU64::new(0),
            listener_stop: CancelToken::new(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Records handed to the broker so far (serialize/produce failures not
    /// counted)
    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Run the produce loop until the payload stream ends, the run deadline
    /// elapses, or cancellation.
    pub async fn run(&self, token: &CancelToken) -> Result<(), EngineError> {
        let mut payloads = self
            .plugin
            .payloads()
            .await
            .map_err(EngineError::Payloads)?;

        initial_delay(self.plugin.initial_delay()).await;
        tracing::trace!("producer past initial delay");

        self.spawn_listeners();

        tracing::info!(
            job = self.plugin.name(),
            topic = %self.config.topic,
            "starting producer"
        );

        let deadline = RunDeadline::after(self.plugin.run_duration());
        let mut pacer = IntervalPacer::new(self.plugin.interval());
        let mut batch_span = self.batch_span();

        loop {
            let payload = tokio::select! {
                maybe = payloads.recv() => match maybe {
                    Some(payload) => payload,
                    None => break,
                },
                _ = token.cancelled() => {
                    self.log_outcome(&batch_span, "produce cancelled");
                    return Err(EngineError::Cancelled);
                }
            };

            tokio::select! {
                _ = pacer.tick() => {}
                _ = token.cancelled() => {}
            }

            if token.is_cancelled() {
                self.log_outcome(&batch_span, "produce cancelled");
                return Err(EngineError::Cancelled);
            }
            if deadline.expired() {
                self.log_outcome(&batch_span, "produce run deadline reached");
                return Ok(());
            }

            let bytes = match serde_json::to_vec(&payload) {
                Ok(bytes) => bytes,
                Err(e) => {
                    batch_span
                        .in_scope(|| tracing::error!(error = %e, "failed to serialize payload"));
                    continue;
                }
            };

            if let Err(e) = self.adapter.produce(content_key(&bytes), bytes).await {
                batch_span.in_scope(|| tracing::error!(error = %e, "failed to produce record"));
                continue;
            }

            let count = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
            if count % self.log_batch_size as u64 == 0 {
                batch_span = self.batch_span();
                batch_span.in_scope(|| tracing::info!(count, "produce batch complete"));
            }
        }

        // Stream exhausted: the one path that waits out in-flight deliveries.
        let outstanding = self.adapter.flush(FLUSH_TIMEOUT).await;
        batch_span.in_scope(|| {
            tracing::info!(
                count = self.submitted_count(),
                outstanding,
                "payload stream exhausted, producer finished"
            );
        });
        Ok(())
    }

    /// Stop the listener tasks and release the adapter
    pub async fn close(&self) {
        self.listener_stop.cancel();
        let handles: Vec<JoinHandle<()>> = {
            let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
            listeners.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
        self.adapter.close().await;
        tracing::info!(job = self.plugin.name(), "producer closed");
    }

    /// Supervised listeners over the adapter's take-once channels. A second
    /// run finds the channels already taken and spawns nothing.
    fn spawn_listeners(&self) {
        let mut handles = Vec::new();

        if let Some(mut reports) = self.adapter.take_delivery_reports() {
            let plugin = self.plugin.clone();
            let stop = self.listener_stop.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let report = tokio::select! {
                        _ = stop.cancelled() => break,
                        maybe = reports.recv() => match maybe {
                            Some(report) => report,
                            None => break,
                        },
                    };
                    handle_report(&*plugin, &report).await;
                }
            }));
        }

        if let Some(mut events) = self.adapter.take_events() {
            let plugin = self.plugin.clone();
            let stop = self.listener_stop.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let event = tokio::select! {
                        _ = stop.cancelled() => break,
                        maybe = events.recv() => match maybe {
                            Some(event) => event,
                            None => break,
                        },
                    };
                    match event {
                        // Reports rerouted off the dedicated channel get the
                        // same treatment they would have had there.
                        BrokerEvent::Delivery(report) => handle_report(&*plugin, &report).await,
                        BrokerEvent::Error(error) => {
                            tracing::error!(error = %error, "broker error event");
                        }
                    }
                }
            }));
        }

        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(handles);
    }

    fn batch_span(&self) -> tracing::Span {
        tracing::info_span!("produce_batch", batch_size = self.log_batch_size)
    }

    fn log_outcome(&self, span: &tracing::Span, message: &'static str) {
        let count = self.submitted_count();
        span.in_scope(|| tracing::info!(count, "{message}"));
    }
}

#[async_trait::async_trait]
impl<A, P> crate::runner::Job for ProducerEngine<A, P>
where
    A: ProducerAdapter,
    P: ProducerPlugin,
{
    fn name(&self) -> &str {
        self.plugin.name()
    }

    fn initial_delay(&self) -> Duration {
        self.plugin.initial_delay()
    }

    fn run_duration(&self) -> Duration {
        self.plugin.run_duration()
    }

    async fn run(&self, token: CancelToken) -> Result<(), EngineError> {
        ProducerEngine::run(self, &token).await
    }

    async fn close(&self) {
        ProducerEngine::close(self).await
    }
}

async fn handle_report<P: ProducerPlugin>(plugin: &P, report: &DeliveryReport) {
    match &report.error {
        Some(error) => {
            tracing::error!(
                error = %error,
                topic = %report.topic,
                partition = report.partition,
                "delivery failed"
            );
        }
        None => {
            if let Err(e) = plugin.on_delivery(report).await {
                tracing::error!(error = %e, "delivery callback failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
