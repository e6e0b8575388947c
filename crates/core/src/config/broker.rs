// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker connection configuration

use serde::Deserialize;
use std::time::Duration;

/// Connection parameters for one broker-backed job
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BrokerConfig {
    /// Bootstrap addresses
    pub brokers: Vec<String>,
    /// Topic the job produces to or consumes from
    pub topic: String,
    /// Consumer group identity (also seeds the producer client id)
    pub group: String,
    pub consumer: ConsumerTuning,
    pub producer: ProducerTuning,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            topic: "payloads".to_string(),
            group: "payload-consumer-group".to_string(),
            consumer: ConsumerTuning::default(),
            producer: ProducerTuning::default(),
        }
    }
}

impl BrokerConfig {
    /// Apply per-job overrides on top of a base connection config.
    /// Unset override fields leave the base value untouched.
    pub fn merged(mut self, overrides: &BrokerOverrides) -> Self {
        if let Some(brokers) = &overrides.brokers {
            self.brokers = brokers.clone();
        }
        if let Some(topic) = &overrides.topic {
            self.topic = topic.clone();
        }
        if let Some(group) = &overrides.group {
            self.group = group.clone();
        }
        self
    }
}

/// Per-job broker overrides (all optional)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BrokerOverrides {
    pub brokers: Option<Vec<String>>,
    pub topic: Option<String>,
    pub group: Option<String>,
}

/// Consumer-side tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConsumerTuning {
    /// When disabled the engine commits each accepted record explicitly
    pub auto_commit_enabled: bool,
    pub auto_offset_reset: String,
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub max_poll_interval: Duration,
}

impl Default for ConsumerTuning {
    fn default() -> Self {
        Self {
            auto_commit_enabled: true,
            auto_offset_reset: "earliest".to_string(),
            session_timeout: Duration::from_secs(10),
            max_poll_interval: Duration::from_secs(300),
        }
    }
}

/// Producer-side tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProducerTuning {
    /// Acknowledgement level: "all", "1", or "0"
    pub acks: String,
    pub compression: String,
    #[serde(with = "humantime_serde")]
    pub linger: Duration,
}

impl Default for ProducerTuning {
    fn default() -> Self {
        Self {
            acks: "all".to_string(),
            compression: "none".to_string(),
            linger: Duration::from_millis(10),
        }
    }
}
