//! Field-preserving patch merge.
//!
//! The merge rule, per node kind: a key present in both documents with two
//! object values recurses; a key present in both where either side is a
//! non-object takes the update value outright (arrays included, no element
//! merging); a key absent from the original is dropped. Patching therefore
//! never introduces new fields at any depth (an inherited policy, recorded
//! in DESIGN.md).

use serde_json::Value;

/// Computes a new document from `original` and a partial `updates` document,
/// preserving the original field set.
#[must_use]
pub fn merge(original: &Value, updates: &Value) -> Value {
    match (original, updates) {
        (Value::Object(original_map), Value::Object(updates_map)) => {
            let mut merged = original_map.clone();
            for (key, update_value) in updates_map {
                if let Some(original_value) = original_map.get(key) {
                    merged.insert(key.clone(), merge(original_value, update_value));
                }
                // Keys unknown to the original are dropped.
            }
            Value::Object(merged)
        }
        _ => updates.clone(),
    }
}
