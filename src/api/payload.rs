//! Helpers shared by the request-payload builders

use serde_json::{Map, Value};

/// Backend key paired with an accessor; the key is sent only when the accessor yields a value.
pub type OptionalField<T> = (&'static str, fn(&T) -> Option<Value>);

/// Copy every present optional field of `item` into `body`.
pub fn copy_optional<T>(body: &mut Map<String, Value>, item: &T, fields: &[OptionalField<T>]) {
    for (key, get) in fields {
        if let Some(value) = get(item) {
            body.insert((*key).to_string(), value);
        }
    }
}

pub fn text(value: &Option<String>) -> Option<Value> {
    value.clone().map(Value::String)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Trailing id of an IRI such as `/prt_praticas/4821`; numeric when it parses.
pub fn id_from_iri(iri: &str) -> Value {
    let last = iri.rsplit('/').next().unwrap_or(iri);
    match last.parse::<u64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(last.to_string()),
    }
}

/// Expect a JSON object; anything else is replaced by an empty map.
pub fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
