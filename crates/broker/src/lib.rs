// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Broker adapter capability surface
//!
//! The engines drive a publish/subscribe broker through the narrow traits
//! defined here; the broker client proper (wire protocol, partition
//! assignment, rebalancing) lives behind them and is not implemented in this
//! repository. `LoopbackBroker` is an in-process stand-in good enough for
//! demos and integration tests.

mod error;
mod loopback;
mod record;
mod traced;
mod traits;

pub use error::BrokerError;
pub use loopback::{LoopbackBroker, LoopbackConsumer, LoopbackProducer};
pub use record::{BrokerEvent, DeliveryReport, Record, TopicMetadata};
pub use traced::{TracedConsumerAdapter, TracedProducerAdapter};
pub use traits::{ConsumerAdapter, ProducerAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeConsumerAdapter, FakeProducerAdapter};
