// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The entity-repo synthetic workload
//!
//! A generator cycles through a fixed set of entities emitting attribute
//! payloads, and a plugin pair adapts it to the job engines: the producer
//! plugin streams generated payloads, the consumer plugin rebuilds the
//! entity map on the other side of the broker.

mod generator;
mod payload;
mod plugin;

pub use generator::{generate_payloads, GeneratorError};
pub use payload::Payload;
pub use plugin::{EntityConsumerPlugin, EntityProducerPlugin};
