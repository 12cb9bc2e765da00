pub mod collections;
pub mod mongodb;
