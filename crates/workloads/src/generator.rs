// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycling payload generator
//!
//! The generator task owns the sending half of a bounded channel and emits
//! payloads until the receiver is dropped or the optional cap is reached.
//! Backpressure comes from the channel bound; there is no pacing here, the
//! consuming engine paces itself.

use crate::payload::Payload;
use sb_core::ProducerJobConfig;
use thiserror::Error;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid configuration: all counts must be greater than zero")]
    InvalidCounts,
}

/// Spawn the generator task for a producer job and return its payload
/// stream.
///
/// Entities cycle `entity-0 .. entity-{n-1}` with the iteration index
/// bumped on each wrap, so every payload is distinct until the cycle
/// repeats an (entity, iteration) pair, which it never does.
pub fn generate_payloads(
    config: &ProducerJobConfig,
) -> Result<mpsc::Receiver<Payload>, GeneratorError> {
    if config.entity_count == 0 || config.attribute_count == 0 {
        return Err(GeneratorError::InvalidCounts);
    }

    let entity_count = config.entity_count as u64;
    let attribute_count = config.attribute_count;
    let max_payloads = config.max_payloads;
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut emitted: u64 = 0;
        let mut iter_idx: u64 = 0;
        loop {
            for entity_idx in 0..entity_count {
                if max_payloads.is_some_and(|cap| emitted >= cap) {
                    tracing::info!(emitted, "generator reached payload cap, closing");
                    return;
                }
                let payload = Payload::synthesize(entity_idx, iter_idx, attribute_count);
                if tx.send(payload).await.is_err() {
                    tracing::info!(emitted, "generator receiver dropped, closing");
                    return;
                }
                emitted += 1;
            }
            iter_idx += 1;
        }
    });

    Ok(rx)
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
