// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One synthetic entity update.
///
/// Attributes live in an ordered map so serialization is deterministic and
/// the content-derived record key is a pure function of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub entity_id: String,
    pub attributes: BTreeMap<String, String>,
}

impl Payload {
    /// Deterministic payload for one (entity, iteration) pair
    pub fn synthesize(entity_idx: u64, iter_idx: u64, attribute_count: usize) -> Self {
        let attributes = (0..attribute_count)
            .map(|i| {
                (
                    format!("attr-{i}"),
                    format!("value-{entity_idx}-{iter_idx}-{i}"),
                )
            })
            .collect();
        Self {
            entity_id: format!("entity-{entity_idx}"),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_is_deterministic() {
        let a = Payload::synthesize(3, 7, 2);
        let b = Payload::synthesize(3, 7, 2);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    #[test]
    fn synthesize_fills_attributes() {
        let payload = Payload::synthesize(1, 0, 3);
        assert_eq!(payload.entity_id, "entity-1");
        assert_eq!(payload.attributes.len(), 3);
        assert_eq!(
            payload.attributes.get("attr-2"),
            Some(&"value-1-0-2".to_string())
        );
    }
}
