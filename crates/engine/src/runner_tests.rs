// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the runner

use super::*;
use sb_core::SequentialIdGen;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

struct TestJob {
    initial_delay: Duration,
    run_duration: Duration,
    wait_for_cancel: bool,
    finished: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl TestJob {
    fn instant(run_duration: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            run_duration,
            wait_for_cancel: false,
            finished: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A job that only returns once its token is cancelled
    fn blocking(run_duration: Duration) -> Self {
        let mut job = Self::instant(run_duration);
        job.wait_for_cancel = true;
        job
    }
}

#[async_trait]
impl Job for TestJob {
    fn name(&self) -> &str {
        "test-job"
    }

    fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    fn run_duration(&self) -> Duration {
        self.run_duration
    }

    async fn run(&self, token: CancelToken) -> Result<(), EngineError> {
        if self.wait_for_cancel {
            token.cancelled().await;
            self.finished.store(true, Ordering::SeqCst);
            return Err(EngineError::Cancelled);
        }
        self.finished.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn test_runner() -> Runner<SystemClock, SequentialIdGen> {
    Runner::new(ExecutionRegistry::with_parts(
        SystemClock,
        SequentialIdGen::new("exec"),
    ))
}

async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..250 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn finished_job_is_closed_and_deregistered() {
    let runner = test_runner();
    let job = TestJob::instant(Duration::from_secs(60));
    let finished = job.finished.clone();
    let closed = job.closed.clone();

    runner.start(job).await;

    wait_until(|| runner.registry().is_empty()).await;
    assert!(finished.load(Ordering::SeqCst));
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn watchdog_cancels_at_the_run_deadline() {
    let runner = test_runner();
    let job = TestJob::blocking(Duration::from_millis(100));
    let closed = job.closed.clone();

    let started = Instant::now();
    runner.start(job).await;

    wait_until(|| closed.load(Ordering::SeqCst)).await;
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(runner.registry().is_empty());
}

#[tokio::test]
async fn registry_close_stops_a_job_early() {
    let runner = test_runner();
    let job = TestJob::blocking(Duration::from_secs(60));
    let closed = job.closed.clone();

    runner.start(job).await;
    let ids = runner.registry().list();
    assert_eq!(ids.len(), 1);

    runner.registry().close(&ids[0]);

    wait_until(|| closed.load(Ordering::SeqCst)).await;
    assert!(runner.registry().is_empty());
}

#[tokio::test]
async fn zero_run_duration_still_runs() {
    let runner = test_runner();
    let job = TestJob::instant(Duration::ZERO);
    let finished = job.finished.clone();

    runner.start(job).await;

    wait_until(|| finished.load(Ordering::SeqCst)).await;
    wait_until(|| runner.registry().is_empty()).await;
}

#[tokio::test]
async fn initial_delay_blocks_the_caller() {
    let runner = test_runner();
    let mut job = TestJob::instant(Duration::from_secs(60));
    job.initial_delay = Duration::from_millis(100);

    let started = Instant::now();
    runner.start(job).await;
    assert!(started.elapsed() >= Duration::from_millis(100));
}
