//! Non-markup logic of the dashboard and the public site.

pub mod api;
pub mod carousel;
pub mod filters;
pub mod toggle;
