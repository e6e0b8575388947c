// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration types and TOML loading

mod broker;
mod job;

pub use broker::{BrokerConfig, BrokerOverrides, ConsumerTuning, ProducerTuning};
pub use job::{ConsumerJobConfig, ProducerJobConfig};

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Progress-log batch window used when a job config leaves the knob unset.
pub const DEFAULT_LOG_BATCH_SIZE: usize = 10_000;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level workload configuration
///
/// A config file describes one broker plus any subset of a producer job and
/// a consumer job. A missing job section means that side is not started.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub broker: BrokerConfig,
    pub producer: Option<ProducerJobConfig>,
    pub consumer: Option<ConsumerJobConfig>,
}

impl Config {
    /// Load and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
