use mongodb::{Collection, Database};

use crate::utils::favicon::FaviconResolver;

pub struct AppState {
    pub db: Database,
    pub favicon: FaviconResolver,
    pub jwt_secret: String,
}

impl AppState {
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection::<T>(name)
    }
}
