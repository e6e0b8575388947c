// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the payload generator

use super::*;

fn config(entity_count: usize, attribute_count: usize) -> ProducerJobConfig {
    ProducerJobConfig {
        entity_count,
        attribute_count,
        ..ProducerJobConfig::default()
    }
}

#[test]
fn zero_counts_are_rejected() {
    assert!(matches!(
        generate_payloads(&config(0, 5)),
        Err(GeneratorError::InvalidCounts)
    ));
    assert!(matches!(
        generate_payloads(&config(5, 0)),
        Err(GeneratorError::InvalidCounts)
    ));
}

#[tokio::test]
async fn entities_cycle_and_iterations_advance() {
    let mut rx = generate_payloads(&config(3, 1)).unwrap();

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(rx.recv().await.unwrap().entity_id);
    }
    assert_eq!(
        ids,
        vec!["entity-0", "entity-1", "entity-2", "entity-0", "entity-1", "entity-2"]
    );

    // The third cycle carries the twice-bumped iteration index.
    let seventh = rx.recv().await.unwrap();
    assert_eq!(seventh.entity_id, "entity-0");
    assert_eq!(
        seventh.attributes.get("attr-0"),
        Some(&"value-0-2-0".to_string())
    );
}

#[tokio::test]
async fn iteration_index_distinguishes_cycles() {
    let mut rx = generate_payloads(&config(2, 1)).unwrap();

    let first = rx.recv().await.unwrap();
    rx.recv().await.unwrap();
    let third = rx.recv().await.unwrap();

    assert_eq!(first.entity_id, third.entity_id);
    assert_ne!(first.attributes, third.attributes);
    assert_eq!(first.attributes.get("attr-0"), Some(&"value-0-0-0".to_string()));
    assert_eq!(third.attributes.get("attr-0"), Some(&"value-0-1-0".to_string()));
}

#[tokio::test]
async fn max_payloads_caps_the_stream() {
    let mut config = config(3, 1);
    config.max_payloads = Some(5);
    let mut rx = generate_payloads(&config).unwrap();

    let mut count = 0;
    while rx.recv().await.is_some() {
        count += 1;
    }
    assert_eq!(count, 5);
}

#[tokio::test]
async fn unbounded_stream_keeps_producing() {
    let mut rx = generate_payloads(&config(2, 2)).unwrap();
    for _ in 0..500 {
        assert!(rx.recv().await.is_some());
    }
}
