use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::object_id;

/// Dashboard administrator. Only admins hold accounts; students browse anonymously.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "object_id::deserialize_optional"
    )]
    pub id: Option<ObjectId>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: i64,
    pub last_login: Option<i64>,
    pub is_active: bool,
}

impl User {
    pub fn new(username: String, email: Option<String>, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password_hash,
            created_at: chrono::Utc::now().timestamp_millis(),
            last_login: None,
            is_active: true,
        }
    }

    pub fn update_last_login(&mut self) {
        self.last_login = Some(chrono::Utc::now().timestamp_millis());
    }
}

// For API responses - stripped of the password hash
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: i64,
    pub last_login: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}
