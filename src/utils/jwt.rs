use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // Subject (username)
    pub user_id: String, // Hex ObjectId of the admin account
    pub exp: usize,
    pub iat: usize,
}

pub fn create_token(secret: &str, user_id: &str, username: &str) -> Result<String> {
    let now = chrono::Utc::now();
    let expiry = now + chrono::Duration::days(10); // 10 days validity

    let claims = Claims {
        sub: username.to_string(),
        user_id: user_id.to_string(),
        exp: expiry.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}
