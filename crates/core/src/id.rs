// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution-ID generation
//!
//! The execution registry never reuses an id, so generation is delegated to
//! a seam: UUIDs in production, sequential ids in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique execution identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;
}

/// UUID-based ID generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential ID generator for testing
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("exec")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_gen_never_repeats() {
        let id_gen = UuidIdGen;
        assert_ne!(id_gen.next(), id_gen.next());
    }

    #[test]
    fn sequential_gen_is_predictable() {
        let id_gen = SequentialIdGen::new("job");
        assert_eq!(id_gen.next(), "job-1");
        assert_eq!(id_gen.next(), "job-2");
    }

    #[test]
    fn sequential_gen_clones_share_the_counter() {
        let a = SequentialIdGen::default();
        let b = a.clone();
        assert_eq!(a.next(), "exec-1");
        assert_eq!(b.next(), "exec-2");
    }
}
