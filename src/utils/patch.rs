use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Fields a client is never allowed to overwrite through a partial update.
const PROTECTED_FIELDS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

/// Overlay the top-level fields of `patch` on `existing` and read the result back.
///
/// The `_id` of `existing` is dropped from the merged value; callers put the
/// stored id back on the returned document.
pub fn merge_patch<T>(existing: &T, mut patch: Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    for field in PROTECTED_FIELDS {
        patch.remove(field);
    }

    let mut base = match serde_json::to_value(existing)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    base.remove("_id");
    base.extend(patch);

    serde_json::from_value(Value::Object(base))
}
