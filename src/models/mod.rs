pub mod detailed_note;
pub mod flag;
pub mod note;
pub mod object_id;
pub mod offer;
pub mod tool;
pub mod update;
pub mod user;
