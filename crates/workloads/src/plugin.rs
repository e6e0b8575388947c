// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine plugins for the entity-repo workload

use crate::generator::generate_payloads;
use crate::payload::Payload;
use async_trait::async_trait;
use sb_broker::{DeliveryReport, Record};
use sb_core::{ConsumerJobConfig, ProducerJobConfig};
use sb_engine::{ConsumerPlugin, PluginError, ProducerPlugin, RecordAck};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Producer-side workload: streams generated entity payloads and counts
/// delivery acknowledgements
pub struct EntityProducerPlugin {
    config: ProducerJobConfig,
    log_batch_size: usize,
    delivered: AtomicU64,
}

impl EntityProducerPlugin {
    pub fn new(config: ProducerJobConfig) -> Self {
        let log_batch_size = config.log_batch_size();
        Self {
            config,
            log_batch_size,
            delivered: AtomicU64::new(0),
        }
    }

    /// Deliveries acknowledged by the broker so far
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProducerPlugin for EntityProducerPlugin {
    type Payload = Payload;

    fn name(&self) -> &str {
        &self.config.job_name
    }

    fn initial_delay(&self) -> Duration {
        self.config.initial_delay
    }

    fn run_duration(&self) -> Duration {
        self.config.run_duration
    }

    fn interval(&self) -> Duration {
        self.config.interval
    }

    async fn payloads(&self) -> Result<mpsc::Receiver<Payload>, PluginError> {
        generate_payloads(&self.config).map_err(|e| PluginError::other(e.to_string()))
    }

    async fn on_delivery(&self, report: &DeliveryReport) -> Result<(), PluginError> {
        let count = self.delivered.fetch_add(1, Ordering::SeqCst) + 1;
        if count % self.log_batch_size as u64 == 0 {
            tracing::info!(
                produce_count = count,
                partition = report.partition,
                offset = report.offset,
                "produced payloads"
            );
        }
        Ok(())
    }
}

/// Consumer-side workload: rebuilds the entity map from consumed payloads
pub struct EntityConsumerPlugin {
    config: ConsumerJobConfig,
    log_batch_size: usize,
    entities: Mutex<HashMap<String, Payload>>,
    consumed: AtomicU64,
}

impl EntityConsumerPlugin {
    pub fn new(config: ConsumerJobConfig) -> Self {
        let log_batch_size = config.log_batch_size();
        Self {
            config,
            log_batch_size,
            entities: Mutex::new(HashMap::new()),
            consumed: AtomicU64::new(0),
        }
    }

    /// Records successfully consumed so far
    pub fn consumed_count(&self) -> u64 {
        self.consumed.load(Ordering::SeqCst)
    }

    /// Distinct entities seen so far
    pub fn entity_count(&self) -> usize {
        self.entities.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Latest payload recorded for an entity
    pub fn entity(&self, entity_id: &str) -> Option<Payload> {
        self.entities
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(entity_id)
            .cloned()
    }
}

#[async_trait]
impl ConsumerPlugin for EntityConsumerPlugin {
    fn name(&self) -> &str {
        &self.config.job_name
    }

    fn initial_delay(&self) -> Duration {
        self.config.initial_delay
    }

    fn run_duration(&self) -> Duration {
        self.config.run_duration
    }

    fn interval(&self) -> Duration {
        self.config.interval
    }

    async fn on_record(&self, ack: &dyn RecordAck, record: &Record) -> Result<(), PluginError> {
        let payload: Payload = serde_json::from_slice(&record.payload)?;

        let entity_count = {
            let mut entities = self.entities.lock().unwrap_or_else(|e| e.into_inner());
            entities.insert(payload.entity_id.clone(), payload);
            entities.len()
        };

        if let Err(e) = ack.accept(record).await {
            tracing::error!(error = %e, offset = record.offset, "failed to accept record");
        }

        let count = self.consumed.fetch_add(1, Ordering::SeqCst) + 1;
        if count % self.log_batch_size as u64 == 0 {
            tracing::info!(
                consume_count = count,
                entity_count,
                offset = record.offset,
                "consumed payloads"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
