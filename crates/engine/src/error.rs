// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy
//!
//! Only fatal-to-run conditions surface as errors: a failed subscribe or a
//! failed payload-stream construction aborts before the loop starts, and
//! cancellation terminates it. Per-iteration failures (poll timeouts, bad
//! payloads, commit hiccups) are logged and the loop keeps going; an elapsed
//! run deadline and an exhausted payload stream are clean successes.

use crate::plugin::PluginError;
use sb_broker::BrokerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The job's cancel token fired before the run finished
    #[error("run cancelled")]
    Cancelled,
    /// Subscribing to the topic failed; the consume loop never started
    #[error("subscribe failed: {0}")]
    Subscribe(#[source] BrokerError),
    /// The plugin could not provide its payload stream; the produce loop
    /// never started
    #[error("payload stream unavailable: {0}")]
    Payloads(#[source] PluginError),
}

impl EngineError {
    /// Cancellation is informational, not a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}
