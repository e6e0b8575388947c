// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellation tokens for bounded jobs
//!
//! A `CancelToken` is the one signal a running engine must observe at every
//! blocking wait: the runner cancels it when a job's run duration elapses or
//! when the execution registry closes the job. Cancelling is idempotent and
//! clones share the same signal.

use std::sync::Arc;
use tokio::sync::watch;

/// Clone-to-share cancellation handle
#[derive(Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation. Idempotent; later calls are no-ops.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Non-blocking check, usable from the hot loop.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is cancelled (immediately if it already is).
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // wait_for inspects the current value first, so a token cancelled
        // before this call resolves without suspending.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
