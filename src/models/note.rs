use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::flag::StringFlag;
use crate::models::object_id;

/// Sub-sections of a note that can be shown or hidden independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSection {
    Notes,
    Quantum,
    Pyq,
}

impl NoteSection {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteSection::Notes => "notes",
            NoteSection::Quantum => "quantum",
            NoteSection::Pyq => "pyq",
        }
    }

    /// Name of the stored flag field for this section.
    pub fn flag_field(self) -> &'static str {
        match self {
            NoteSection::Notes => "notesActive",
            NoteSection::Quantum => "quantumActive",
            NoteSection::Pyq => "pyqActive",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Note {
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
    #[validate(length(min = 1, message = "Notes code is required"))]
    pub notes_code: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub notes_link: Option<String>,
    #[serde(default)]
    pub quantum_link: Option<String>,
    #[serde(default)]
    pub pyq_link: Option<String>,
    #[serde(default)]
    pub notes_active: StringFlag,
    #[serde(default)]
    pub quantum_active: StringFlag,
    #[serde(default)]
    pub pyq_active: StringFlag,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Note {
    pub fn section_active(&self, section: NoteSection) -> bool {
        match section {
            NoteSection::Notes => self.notes_active.is_on(),
            NoteSection::Quantum => self.quantum_active.is_on(),
            NoteSection::Pyq => self.pyq_active.is_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "title": "Data Structures",
            "notesCode": "KCS301",
            "notesActive": "true",
            "quantumActive": "false",
            "pyqActive": "true"
        }))
        .unwrap();
        assert!(note.section_active(NoteSection::Notes));
        assert!(!note.section_active(NoteSection::Quantum));
        assert!(note.section_active(NoteSection::Pyq));
        assert_eq!(NoteSection::Quantum.flag_field(), "quantumActive");
    }

    #[test]
    fn section_parses_from_path_segment() {
        let s: NoteSection = serde_json::from_str("\"pyq\"").unwrap();
        assert_eq!(s, NoteSection::Pyq);
    }
}
