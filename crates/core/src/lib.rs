// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sb-core: Core library for the streambed workload generator
//!
//! This crate provides:
//! - Timing primitives shared by the producer and consumer engines
//!   (initial-delay gate, run deadline, interval pacer)
//! - Cancellation tokens carried by every bounded job
//! - Clock and ID-generation abstractions for testable time and identity
//! - Configuration types and TOML loading

pub mod cancel;
pub mod clock;
pub mod config;
pub mod id;
pub mod timing;

// Re-exports
pub use cancel::CancelToken;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    BrokerConfig, Config, ConfigError, ConsumerJobConfig, ConsumerTuning, ProducerJobConfig,
    ProducerTuning, DEFAULT_LOG_BATCH_SIZE,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use timing::{initial_delay, IntervalPacer, RunDeadline};
