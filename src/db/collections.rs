//! Collection names shared by the handlers.

pub const NOTES: &str = "notes";
pub const DETAILED_NOTES: &str = "detailed_notes";
pub const UPDATES: &str = "updates";
pub const TOOLS: &str = "tools";
pub const OFFERS: &str = "offers";
pub const USERS: &str = "users";
