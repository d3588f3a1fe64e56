//! Canonical form for policy documents.
//!
//! Two policy documents are semantically equal when they encode the same
//! permissions regardless of object key order or formatting. Canonicalization
//! recursively sorts object keys; array ordering is normalized away only when
//! the configuration treats statement order as insignificant.

use serde_json::{Map, Value};

use crate::config::StatementOrder;

/// Reduce a policy document to its canonical comparable form.
///
/// Object keys are sorted at every level. Under
/// [`StatementOrder::Insignificant`] arrays are additionally sorted by the
/// canonical rendering of their elements, so a reordered `Statement` list
/// compares equal to the baseline. Under [`StatementOrder::Significant`]
/// array order is preserved as-is.
#[must_use]
pub fn canonicalize(value: Value, order: StatementOrder) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v, order)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, v);
            }
            Value::Object(sorted)
        }
        Value::Array(items) => {
            let mut items: Vec<Value> = items
                .into_iter()
                .map(|v| canonicalize(v, order))
                .collect();
            if order == StatementOrder::Insignificant {
                items.sort_by_key(Value::to_string);
            }
            Value::Array(items)
        }
        other => other,
    }
}

/// Render a canonical document as indented text for reporting.
#[must_use]
pub fn canonical_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
