// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner: turns an engine into a registered, time-bounded background job
//!
//! The runner owns the lifecycle glue both engines share: the outer
//! scheduling delay, registration, the watchdog that enforces the run
//! budget, and the guaranteed close-and-deregister on exit.

use crate::error::EngineError;
use crate::registry::ExecutionRegistry;
use async_trait::async_trait;
use sb_core::{initial_delay, CancelToken, Clock, IdGen, SystemClock, UuidIdGen};
use std::time::Duration;
use tracing::Instrument;

/// A runnable, closeable unit of work. Both engines implement this.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Outer scheduling delay, applied before the job is registered. Any
    /// warm-up delay the job applies internally compounds with this one.
    fn initial_delay(&self) -> Duration;

    /// Run budget enforced by the runner's watchdog; zero disables it
    fn run_duration(&self) -> Duration;

    async fn run(&self, token: CancelToken) -> Result<(), EngineError>;

    /// Release the job's resources. Called exactly once, after `run`
    /// returns, whatever way it ended.
    async fn close(&self);
}

/// Starts jobs under a shared execution registry
#[derive(Clone)]
pub struct Runner<C: Clock = SystemClock, I: IdGen = UuidIdGen> {
    registry: ExecutionRegistry<C, I>,
}

impl<C: Clock, I: IdGen> Runner<C, I> {
    pub fn new(registry: ExecutionRegistry<C, I>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExecutionRegistry<C, I> {
        &self.registry
    }

    /// Start a job in the background, fire-and-forget.
    ///
    /// Blocks the caller for the job's initial delay, then registers the
    /// job and detaches. Outcomes surface only through logs and the
    /// registry; the job is deregistered when it exits, and cancelling
    /// through the registry stops it early.
    pub async fn start<J: Job>(&self, job: J) {
        let run_duration = job.run_duration();
        if run_duration.is_zero() {
            tracing::error!(
                job = job.name(),
                "run duration is not positive, job will not be time-bounded"
            );
        }

        initial_delay(job.initial_delay()).await;

        let token = CancelToken::new();
        let id = self.registry.add(job.name(), token.clone());
        let span = tracing::info_span!("job", name = %job.name(), exec_id = %id);

        if !run_duration.is_zero() {
            let watchdog = token.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(run_duration) => watchdog.cancel(),
                    _ = watchdog.cancelled() => {}
                }
            });
        }

        let registry = self.registry.clone();
        tokio::spawn(
            async move {
                match job.run(token).await {
                    Ok(()) => tracing::info!("job finished"),
                    Err(e) if e.is_cancelled() => tracing::info!("job cancelled"),
                    Err(e) => tracing::error!(error = %e, "job failed"),
                }
                job.close().await;
                registry.close(&id);
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
