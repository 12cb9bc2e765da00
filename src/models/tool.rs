use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::object_id;

pub const DEFAULT_ICON: &str = "/placeholder.svg";

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "object_id::deserialize_optional"
    )]
    pub id: Option<ObjectId>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Link is required"))]
    pub link: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub favicon_url: Option<String>, // Resolved from the linked page, null when lookup failed
    #[serde(default)]
    pub tag: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Tool {
    pub fn new(
        title: String,
        description: String,
        link: String,
        icon: Option<String>,
        tag: Option<String>,
        order: i64,
        favicon_url: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();

        Self {
            id: None,
            title,
            description,
            link,
            icon: icon.filter(|i| !i.trim().is_empty()).unwrap_or_else(default_icon),
            favicon_url,
            tag: tag.unwrap_or_default(),
            is_active: true,
            order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Display priority for a new tool: one past the current maximum, starting at 1.
/// Negative orders are pinned above the list, so they never push a new tool below 1.
pub fn next_order(current_max: Option<i64>) -> i64 {
    current_max.map_or(1, |max| max.max(0).saturating_add(1))
}

/// Whether an edit moved the tool to a new link and needs its favicon looked up again.
pub fn needs_favicon_refresh(existing: &Tool, updated: &Tool) -> bool {
    existing.link.trim() != updated.link.trim()
}

/// Tools the public page shows; a missing `isActive` reads as active.
pub fn active_filter() -> Document {
    doc! { "isActive": { "$ne": false } }
}

/// Pipeline value that flips `isActive`, treating a missing field as active.
pub fn toggled_active_expr() -> Document {
    doc! { "$not": [{ "$ifNull": ["$isActive", true] }] }
}
