pub mod api_json;
pub mod drive_link;
pub mod favicon;
pub mod jwt;
pub mod patch;
