//! Shared helpers for workspace specs

use sb_core::{ConsumerJobConfig, ProducerJobConfig};
use std::time::Duration;

/// Producer job emitting a finite stream with no run deadline
pub fn finite_producer(entity_count: usize, max_payloads: u64) -> ProducerJobConfig {
    ProducerJobConfig {
        entity_count,
        attribute_count: 2,
        max_payloads: Some(max_payloads),
        run_duration: Duration::ZERO,
        log_batch_size: Some(4),
        ..ProducerJobConfig::default()
    }
}

/// Consumer job bounded by a short run deadline
pub fn bounded_consumer(run_duration: Duration) -> ConsumerJobConfig {
    ConsumerJobConfig {
        run_duration,
        log_batch_size: Some(4),
        ..ConsumerJobConfig::default()
    }
}

/// Poll a condition until it holds or a generous deadline passes
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..300 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition never became true");
}
