use serde::Deserialize;
use validator::Validate;

use crate::models::flag::StringFlag;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub link: Option<String>,
    pub is_active: Option<StringFlag>,
}
