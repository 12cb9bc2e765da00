use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::flag::StringFlag;
use crate::models::object_id;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteUnit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DetailedNote {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "object_id::deserialize_optional"
    )]
    pub id: Option<ObjectId>,
    #[validate(length(min = 1, message = "Notes code is required"))]
    pub notes_code: String, // Matched case-insensitively against Note::notes_code
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub units: Vec<NoteUnit>,
    #[serde(default = "StringFlag::on")]
    pub is_active: StringFlag,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl DetailedNote {
    pub fn matches_code(&self, notes_code: &str) -> bool {
        self.notes_code.trim().eq_ignore_ascii_case(notes_code.trim())
    }
}
