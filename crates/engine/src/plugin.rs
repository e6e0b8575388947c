// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The plugin contract: the polymorphic seam between an engine and its
//! workload
//!
//! A plugin supplies the timing parameters for one bounded run plus exactly
//! one dispatch surface: a payload stream on the producer side, a per-record
//! handler on the consumer side. Plugins own their domain counters; the
//! engine's single dispatch path is the only caller, so interior mutability
//! never sees contention.

use async_trait::async_trait;
use sb_broker::{BrokerError, DeliveryReport, Record};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by plugin callbacks
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl PluginError {
    pub fn other(message: impl Into<String>) -> Self {
        PluginError::Other(message.into())
    }
}

/// Capability-limited view of the consumer engine handed to record handlers.
///
/// Handlers may accept (commit) or reject a record and nothing else.
#[async_trait]
pub trait RecordAck: Send + Sync {
    /// Acknowledge a handled record. When auto-commit is disabled this
    /// commits the record's offset; commit failures are logged, never
    /// propagated.
    async fn accept(&self, record: &Record) -> Result<(), BrokerError>;

    /// Reject a record. Currently a no-op hook reserved for dead-letter
    /// routing, kept so handlers have the symmetric vocabulary.
    async fn reject(&self, record: &Record) -> Result<(), BrokerError>;
}

/// Workload strategy for one producer run
#[async_trait]
pub trait ProducerPlugin: Send + Sync + 'static {
    /// Payload type the plugin emits; serialized by the engine
    type Payload: Serialize + Send + 'static;

    /// Human-readable job name
    fn name(&self) -> &str;

    /// Warm-up delay applied inside the engine's run, after the runner's
    /// own scheduling delay. The two compound.
    fn initial_delay(&self) -> Duration;

    /// Run budget; zero means "until the payload stream ends"
    fn run_duration(&self) -> Duration;

    /// Pacing interval between payloads; zero disables pacing
    fn interval(&self) -> Duration;

    /// Open the lazy payload stream. Failure is fatal to the run.
    async fn payloads(&self) -> Result<mpsc::Receiver<Self::Payload>, PluginError>;

    /// Called for every successful delivery report; the producer-side
    /// progress hook
    async fn on_delivery(&self, report: &DeliveryReport) -> Result<(), PluginError>;
}

/// Workload strategy for one consumer run
#[async_trait]
pub trait ConsumerPlugin: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Warm-up delay applied inside the engine's run (see
    /// [`ProducerPlugin::initial_delay`])
    fn initial_delay(&self) -> Duration;

    /// Run budget; zero means "until cancelled"
    fn run_duration(&self) -> Duration;

    /// Pacing interval between reads; zero disables pacing
    fn interval(&self) -> Duration;

    /// Handle one record. The engine passes itself as the ack capability.
    /// An error skips the record (at most one attempt, no retry).
    async fn on_record(&self, ack: &dyn RecordAck, record: &Record) -> Result<(), PluginError>;
}
