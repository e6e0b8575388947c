// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution registry: operational visibility and forced shutdown for
//! in-flight jobs
//!
//! One registry instance is constructed by whoever bootstraps jobs and
//! cloned to every runner; there is no process-global state. Every id in the
//! map corresponds to exactly one still-running job and ids are never
//! reused.

use sb_core::{CancelToken, Clock, IdGen, SystemClock, UuidIdGen};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

struct Execution {
    job_name: String,
    started_at: Instant,
    cancel: CancelToken,
}

/// Snapshot of one tracked execution
#[derive(Debug, Clone)]
pub struct ExecutionInfo {
    pub id: String,
    pub job_name: String,
    pub started_at: Instant,
}

/// Process-wide map of running jobs, clone-to-share
#[derive(Clone)]
pub struct ExecutionRegistry<C: Clock = SystemClock, I: IdGen = UuidIdGen> {
    jobs: Arc<RwLock<HashMap<String, Execution>>>,
    clock: C,
    id_gen: I,
}

impl ExecutionRegistry {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, UuidIdGen)
    }
}

impl Default for ExecutionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, I: IdGen> ExecutionRegistry<C, I> {
    /// Build a registry over explicit clock and id-gen seams (tests use
    /// `FakeClock`/`SequentialIdGen`)
    pub fn with_parts(clock: C, id_gen: I) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            clock,
            id_gen,
        }
    }

    /// Track a newly started job; returns its fresh execution id
    pub fn add(&self, job_name: &str, cancel: CancelToken) -> String {
        let id = self.id_gen.next();
        let execution = Execution {
            job_name: job_name.to_string(),
            started_at: self.clock.now(),
            cancel,
        };
        let mut jobs = self.jobs.write().unwrap_or_else(|e| e.into_inner());
        jobs.insert(id.clone(), execution);
        tracing::info!(exec_id = %id, job_name, "job registered");
        id
    }

    /// Snapshot of currently tracked ids; no ordering guarantee
    pub fn list(&self) -> Vec<String> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.keys().cloned().collect()
    }

    /// Snapshot with names and start times, for job listings
    pub fn snapshot(&self) -> Vec<ExecutionInfo> {
        let jobs = self.jobs.read().unwrap_or_else(|e| e.into_inner());
        jobs.iter()
            .map(|(id, execution)| ExecutionInfo {
                id: id.clone(),
                job_name: execution.job_name.clone(),
                started_at: execution.started_at,
            })
            .collect()
    }

    /// Cancel and forget a job. Unknown ids are tolerated: closing a job
    /// that already finished is a warning, not an error.
    pub fn close(&self, id: &str) {
        let removed = {
            let mut jobs = self.jobs.write().unwrap_or_else(|e| e.into_inner());
            jobs.remove(id)
        };
        match removed {
            // The lock is released before the cancel callback runs.
            Some(execution) => {
                execution.cancel.cancel();
                tracing::info!(exec_id = %id, job_name = %execution.job_name, "job closed");
            }
            None => {
                tracing::warn!(exec_id = %id, "execution not found in registry, cannot close");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
