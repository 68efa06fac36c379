//! Canonical encoding of realized values.
//!
//! The encoding must be byte-stable: the replay checker rebuilds each line
//! independently of the echo body and matches it exactly.

use serde_json::{Map, Value as JsonValue};
use stew_ir::value::Value;

/// Declared-type tag written alongside each normalized value.
pub fn tag(value: &Value) -> &'static str {
    match value {
        Value::None => "none",
        Value::Bool(_) => "bool",
        Value::Int(_) | Value::Artifact(_) => "int",
        Value::Float(_) => "float",
        Value::Str(_) => "str",
        Value::List(_) => "list",
        Value::Set(_) => "set",
        Value::Dict(_) => "dict",
        Value::Metadata(_) => "metadata",
        Value::Column(_) => "metadata_column",
    }
}

/// JSON form of a value and its tag.
pub fn normalize(value: &Value) -> (JsonValue, &'static str) {
    (to_json(value), tag(value))
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::None => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(x) => JsonValue::from(*x),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Artifact(artifact) => JsonValue::from(artifact.get_int()),
        Value::Metadata(md) => md.to_json(),
        Value::Column(column) => column.to_json(),
        Value::List(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Set(items) => {
            // Sorted by encoded text so iteration order never leaks.
            let mut encoded: Vec<(String, JsonValue)> = items
                .iter()
                .map(|item| {
                    let json = to_json(item);
                    (json.to_string(), json)
                })
                .collect();
            encoded.sort_by(|a, b| a.0.cmp(&b.0));
            JsonValue::Array(encoded.into_iter().map(|(_, json)| json).collect())
        }
        Value::Dict(entries) => {
            let mut map = Map::new();
            for (key, item) in entries {
                map.insert(key.clone(), to_json(item));
            }
            JsonValue::Object(map)
        }
    }
}

/// `["<name>", <normalized>, "<tag>"]` in compact JSON.
pub fn canonical_line(name: &str, value: &Value) -> String {
    let (json, tag) = normalize(value);
    JsonValue::Array(vec![
        JsonValue::String(name.to_string()),
        json,
        JsonValue::String(tag.to_string()),
    ])
    .to_string()
}
