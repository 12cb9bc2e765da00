use serde::Serialize;
use serde_json::Value;

/// Serialize a document for the API, writing ObjectIds as plain hex strings.
///
/// Stored documents keep real ObjectIds; serde_json would otherwise render
/// them as `{"$oid": "..."}`.
pub fn api_json<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    let mut json = serde_json::to_value(value)?;
    flatten_object_ids(&mut json);
    Ok(json)
}

fn object_id_hex(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get("$oid")?.as_str().map(str::to_string)
}

fn flatten_object_ids(value: &mut Value) {
    if let Some(hex) = object_id_hex(value) {
        *value = Value::String(hex);
        return;
    }
    match value {
        Value::Object(map) => map.values_mut().for_each(flatten_object_ids),
        Value::Array(items) => items.iter_mut().for_each(flatten_object_ids),
        _ => {}
    }
}
