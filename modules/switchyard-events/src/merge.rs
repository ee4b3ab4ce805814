//! Shallow merge of JSON objects.
//!
//! Used when assembling event metadata and, by convention, inside
//! transitions that fold a payload into object-shaped state.

use serde_json::{Map, Value};

/// Copy `base`, then overwrite it field by field with `partial`.
pub fn merge(base: &Map<String, Value>, partial: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// [`merge`] lifted to arbitrary values. A non-object side contributes no
/// fields; when neither side is an object, `base` is returned as-is.
pub fn merge_value(base: &Value, partial: &Value) -> Value {
    match (base, partial) {
        (Value::Object(base), Value::Object(partial)) => Value::Object(merge(base, partial)),
        (_, Value::Object(partial)) => Value::Object(partial.clone()),
        _ => base.clone(),
    }
}
