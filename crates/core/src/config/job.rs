// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job configuration
//!
//! Every duration knob treats zero as "disabled": no initial delay, no run
//! deadline (run until the stream ends or the job is cancelled), no pacing.

use super::broker::BrokerOverrides;
use super::DEFAULT_LOG_BATCH_SIZE;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for one producer job
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProducerJobConfig {
    pub job_name: String,
    /// Number of distinct entities the generator cycles through
    pub entity_count: usize,
    /// Attributes per generated payload
    pub attribute_count: usize,
    /// Cap on generated payloads; unset means the stream is unbounded
    pub max_payloads: Option<u64>,
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub run_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    pub log_batch_size: Option<usize>,
    pub broker_overrides: BrokerOverrides,
}

impl Default for ProducerJobConfig {
    fn default() -> Self {
        Self {
            job_name: "entity-producer".to_string(),
            entity_count: 100,
            attribute_count: 10,
            max_payloads: None,
            initial_delay: Duration::ZERO,
            run_duration: Duration::from_secs(120),
            interval: Duration::ZERO,
            log_batch_size: None,
            broker_overrides: BrokerOverrides::default(),
        }
    }
}

impl ProducerJobConfig {
    pub fn log_batch_size(&self) -> usize {
        resolve_batch_size(self.log_batch_size)
    }
}

/// Configuration for one consumer job
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConsumerJobConfig {
    pub job_name: String,
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub run_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    pub log_batch_size: Option<usize>,
    pub broker_overrides: BrokerOverrides,
}

impl Default for ConsumerJobConfig {
    fn default() -> Self {
        Self {
            job_name: "entity-consumer".to_string(),
            initial_delay: Duration::ZERO,
            run_duration: Duration::from_secs(120),
            interval: Duration::ZERO,
            log_batch_size: None,
            broker_overrides: BrokerOverrides::default(),
        }
    }
}

impl ConsumerJobConfig {
    pub fn log_batch_size(&self) -> usize {
        resolve_batch_size(self.log_batch_size)
    }
}

fn resolve_batch_size(configured: Option<usize>) -> usize {
    match configured {
        Some(size) if size > 0 => size,
        _ => DEFAULT_LOG_BATCH_SIZE,
    }
}
