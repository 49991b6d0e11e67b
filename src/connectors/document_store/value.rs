//! Conversion between plain JSON and Firestore's typed value encoding.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Number, Value};

/// Top-level fields stored as Firestore timestamps rather than strings.
const TIMESTAMP_FIELDS: &[&str] = &["createdAt"];

pub(crate) fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| {
                let encoded = if TIMESTAMP_FIELDS.contains(&key.as_str()) {
                    encode_timestamp(value).unwrap_or_else(|| encode(value))
                } else {
                    encode(value)
                };
                (key.clone(), encoded)
            })
            .collect(),
    )
}

fn encode_timestamp(value: &Value) -> Option<Value> {
    let parsed = DateTime::parse_from_rfc3339(value.as_str()?).ok()?;
    let utc = parsed.with_timezone(&Utc);
    Some(json!({ "timestampValue": utc.to_rfc3339_opts(SecondsFormat::AutoSi, true) }))
}

pub(crate) fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore transports 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a `fields` map; anything that is not an object decodes to `{}`.
pub(crate) fn decode_fields(fields: Option<&Value>) -> Value {
    Value::Object(
        fields
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), decode(value)))
                    .collect::<Map<String, Value>>()
            })
            .unwrap_or_default(),
    )
}

pub(crate) fn decode(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|obj| obj.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" | "booleanValue" => {
            inner.clone()
        }
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => decode_fields(inner.get("fields")),
        "geoPointValue" => inner.clone(),
        _ => Value::Null,
    }
}
