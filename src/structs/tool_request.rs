use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Link is required"))]
    pub link: String,
    pub icon: Option<String>,
    pub tag: Option<String>,
    pub order: Option<i64>, // Auto-assigned when omitted
    pub is_active: Option<bool>,
}
