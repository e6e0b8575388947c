// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker error taxonomy

use thiserror::Error;

/// Errors surfaced by broker adapters.
///
/// `Timeout` is the quiet-poll case: the engines swallow it and keep
/// looping, so adapters must use it only for "nothing arrived in time".
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    #[error("poll timed out")]
    Timeout,
    #[error("subscribe to {topic} failed: {reason}")]
    Subscribe { topic: String, reason: String },
    #[error("produce failed: {0}")]
    Produce(String),
    #[error("commit failed: {0}")]
    Commit(String),
    #[error("broker connection lost: {0}")]
    Disconnected(String),
    #[error("adapter is closed")]
    Closed,
}

impl BrokerError {
    /// Timeout-class errors are expected during quiet polls and are not
    /// counted as failures by the engines.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrokerError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeout_is_timeout_class() {
        assert!(BrokerError::Timeout.is_timeout());
        assert!(!BrokerError::Closed.is_timeout());
        assert!(!BrokerError::Produce("boom".into()).is_timeout());
    }
}
