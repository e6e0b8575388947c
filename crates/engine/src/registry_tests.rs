// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the execution registry

use super::*;
use sb_core::SequentialIdGen;

fn test_registry() -> ExecutionRegistry<SystemClock, SequentialIdGen> {
    ExecutionRegistry::with_parts(SystemClock, SequentialIdGen::new("exec"))
}

#[test]
fn add_returns_fresh_ids() {
    let registry = test_registry();
    let a = registry.add("producer", CancelToken::new());
    let b = registry.add("consumer", CancelToken::new());

    assert_ne!(a, b);
    assert_eq!(registry.len(), 2);

    let mut ids = registry.list();
    ids.sort();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn close_cancels_and_removes() {
    let registry = test_registry();
    let token = CancelToken::new();
    let id = registry.add("producer", token.clone());

    assert!(!token.is_cancelled());
    registry.close(&id);

    assert!(token.is_cancelled());
    assert!(registry.is_empty());
}

#[test]
fn close_unknown_id_is_a_tolerated_noop() {
    let registry = test_registry();
    registry.close("nonexistent");
    assert!(registry.is_empty());

    // A tracked job is unaffected by a bogus close.
    let token = CancelToken::new();
    let id = registry.add("consumer", token.clone());
    registry.close("also-nonexistent");
    assert_eq!(registry.list(), vec![id]);
    assert!(!token.is_cancelled());
}

#[test]
fn close_twice_does_not_panic() {
    let registry = test_registry();
    let id = registry.add("producer", CancelToken::new());
    registry.close(&id);
    registry.close(&id);
    assert!(registry.is_empty());
}

#[test]
fn snapshot_carries_job_names() {
    let registry = test_registry();
    registry.add("entity-producer", CancelToken::new());

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].job_name, "entity-producer");
}

#[test]
fn concurrent_adds_never_collide() {
    let registry = ExecutionRegistry::new();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                registry.add("job", CancelToken::new());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.len(), 400);
}
