use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::flag::StringFlag;
use crate::models::object_id;

/// Announcement shown in the "latest updates" strip.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "object_id::deserialize_optional"
    )]
    pub id: Option<ObjectId>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "StringFlag::on")]
    pub is_active: StringFlag,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Update {
    pub fn new(title: String, description: String, link: Option<String>, is_active: bool) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: None,
            title,
            description,
            link,
            is_active: StringFlag(is_active),
            created_at: now,
            updated_at: now,
        }
    }
}
