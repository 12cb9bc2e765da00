use serde::Deserialize;

/// `?admin=true` lists inactive documents too.
#[derive(Deserialize, Default)]
pub struct AdminQuery {
    pub admin: Option<bool>,
}

impl AdminQuery {
    pub fn is_admin(&self) -> bool {
        self.admin.unwrap_or(false)
    }
}

#[derive(Deserialize, Default)]
pub struct DetailedNoteQuery {
    #[serde(rename = "notesCode")]
    pub notes_code: Option<String>,
}
