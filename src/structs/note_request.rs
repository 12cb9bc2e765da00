use serde::Deserialize;
use validator::Validate;

use crate::models::detailed_note::NoteUnit;
use crate::models::flag::StringFlag;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Notes code is required"))]
    pub notes_code: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub semester: String,
    pub thumbnail: Option<String>,
    pub notes_link: Option<String>,
    pub quantum_link: Option<String>,
    pub pyq_link: Option<String>,
    pub notes_active: Option<StringFlag>,
    pub quantum_active: Option<StringFlag>,
    pub pyq_active: Option<StringFlag>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetailedNoteRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Notes code is required"))]
    pub notes_code: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub units: Vec<NoteUnit>,
    pub is_active: Option<StringFlag>,
}
