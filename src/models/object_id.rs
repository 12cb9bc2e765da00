use mongodb::bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Deserializer, de::Error};

/// Read an optional `_id` stored as an ObjectId or sent over the API as a hex string.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<ObjectId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::ObjectId(oid)) => Ok(Some(oid)),
        Some(Bson::String(hex)) => ObjectId::parse_str(&hex).map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!("expected an ObjectId, got {}", other))),
    }
}
