pub mod note_request;
pub mod query;
pub mod tool_request;
pub mod update_request;
