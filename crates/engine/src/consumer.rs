// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consumer engine: a bounded read loop dispatching records to a plugin

use crate::error::EngineError;
use crate::plugin::{ConsumerPlugin, RecordAck};
use async_trait::async_trait;
use sb_broker::{BrokerError, ConsumerAdapter, Record, TopicMetadata};
use sb_core::{
    initial_delay, BrokerConfig, CancelToken, IntervalPacer, RunDeadline, DEFAULT_LOG_BATCH_SIZE,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::Instrument;

/// Poll window for a single broker read. Transient quiet polls surface as
/// timeout errors and are swallowed; this also bounds how long a cancelled
/// engine keeps an adapter call outstanding.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives one bounded consume run against a broker adapter.
///
/// The adapter handle is owned exclusively by this engine and closed when
/// the engine is closed, whatever way the run ended.
pub struct ConsumerEngine<A, P> {
    adapter: A,
    config: BrokerConfig,
    plugin: P,
    log_batch_size: usize,
    processed: AtomicU64,
}

impl<A, P> ConsumerEngine<A, P>
where
    A: ConsumerAdapter,
    P: ConsumerPlugin,
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
            plugin,
            log_batch_size,
            processed: AtomicU64::new(0),
        }
    }

    /// Records successfully handled so far (failed dispatches not counted)
    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Topic metadata through the owned adapter
    pub async fn metadata(&self) -> Result<TopicMetadata, BrokerError> {
        self.adapter
            .metadata(&self.config.topic, METADATA_TIMEOUT)
            .await
    }

    /// Run the consume loop until the run deadline, cancellation, or a
    /// fatal subscribe failure.
    pub async fn run(&self, token: &CancelToken) -> Result<(), EngineError> {
        initial_delay(self.plugin.initial_delay()).await;
        tracing::trace!("consumer past initial delay");

        self.adapter
            .subscribe(&self.config.topic)
            .await
            .map_err(EngineError::Subscribe)?;

        tracing::info!(
            job = self.plugin.name(),
            topic = %self.config.topic,
            group = %self.config.group,
            "starting consumer"
        );

        // The run budget starts at loop entry, after the inner delay.
        let deadline = RunDeadline::after(self.plugin.run_duration());
        let mut pacer = IntervalPacer::new(self.plugin.interval());
        let mut batch_span = self.batch_span();
        let mut last: Option<Record> = None;

        loop {
            tokio::select! {
                _ = pacer.tick() => {}
                _ = token.cancelled() => {}
            }

            if token.is_cancelled() {
                self.log_outcome(&batch_span, last.as_ref(), "consume cancelled");
                return Err(EngineError::Cancelled);
            }
            if deadline.expired() {
                self.log_outcome(&batch_span, last.as_ref(), "consume run deadline reached");
                return Ok(());
            }

            let record = match self.adapter.read_next(POLL_TIMEOUT).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    batch_span.in_scope(|| tracing::warn!("empty delivery, skipping"));
                    continue;
                }
                Err(e) if e.is_timeout() => continue,
                Err(e) => {
                    batch_span.in_scope(|| tracing::error!(error = %e, "error reading record"));
                    continue;
                }
            };

            if let Err(e) = self
                .plugin
                .on_record(self, &record)
                .instrument(batch_span.clone())
                .await
            {
                batch_span.in_scope(|| {
                    tracing::error!(
                        error = %e,
                        key = %record.key_display(),
                        partition = record.partition,
                        offset = record.offset,
                        "record handler failed, skipping record"
                    );
                });
                continue;
            }

            let count = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
            last = Some(record);
            if count % self.log_batch_size as u64 == 0 {
                // Close out the old batch window and open the next.
                batch_span = self.batch_span();
                if let Some(record) = &last {
                    batch_span.in_scope(|| {
                        tracing::info!(
                            count,
                            partition = record.partition,
                            offset = record.offset,
                            "consume batch complete"
                        );
                    });
                }
            }
        }
    }

    /// Close the owned adapter. Idempotent at the adapter's discretion.
    pub async fn close(&self) {
        self.adapter.close().await;
        tracing::info!(job = self.plugin.name(), "consumer closed");
    }

    fn batch_span(&self) -> tracing::Span {
        tracing::info_span!("consume_batch", batch_size = self.log_batch_size)
    }

    fn log_outcome(&self, span: &tracing::Span, last: Option<&Record>, message: &'static str) {
        let count = self.processed_count();
        span.in_scope(|| match last {
            Some(record) => tracing::info!(
                count,
                partition = record.partition,
                offset = record.offset,
                "{message}"
            ),
            None => tracing::info!(count, "{message}"),
        });
    }
}

#[async_trait]
impl<A, P> crate::runner::Job for ConsumerEngine<A, P>
where
    A: ConsumerAdapter,
    P: ConsumerPlugin,
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
        ConsumerEngine::run(self, &token).await
    }

    async fn close(&self) {
        ConsumerEngine::close(self).await
    }
}

#[async_trait]
impl<A, P> RecordAck for ConsumerEngine<A, P>
where
    A: ConsumerAdapter,
    P: ConsumerPlugin,
{
    async fn accept(&self, record: &Record) -> Result<(), BrokerError> {
        // With auto-commit on, the broker client owns offset progress.
        if !self.config.consumer.auto_commit_enabled {
            if let Err(e) = self.adapter.commit(record).await {
                tracing::error!(
                    error = %e,
                    partition = record.partition,
                    offset = record.offset,
                    "failed to commit record"
                );
            }
        }
        Ok(())
    }

    async fn reject(&self, _record: &Record) -> Result<(), BrokerError> {
        // Reserved for dead-letter routing.
        Ok(())
    }
}

#[cfg(test)]
#[path = "consumer_tests.rs"]
mod tests;
