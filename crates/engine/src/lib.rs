// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! streambed job engines
//!
//! A symmetric pair of bounded engines drives a pluggable workload against a
//! broker adapter: the producer engine drains a payload stream into the
//! broker, the consumer engine drains the broker into a per-record handler.
//! Both apply the same timing discipline (initial delay, run deadline,
//! interval pacing) and report progress in batch windows. The runner starts
//! engines as registered, cancellable jobs.

mod consumer;
mod error;
mod plugin;
mod producer;
mod registry;
mod runner;

pub use consumer::{ConsumerEngine, POLL_TIMEOUT};
pub use error::EngineError;
pub use plugin::{ConsumerPlugin, PluginError, ProducerPlugin, RecordAck};
pub use producer::{content_key, ProducerEngine, FLUSH_TIMEOUT};
pub use registry::{ExecutionInfo, ExecutionRegistry};
pub use runner::{Job, Runner};
