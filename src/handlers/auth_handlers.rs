use actix_web::{HttpMessage, HttpRequest, HttpResponse, Result, error, web};
use bcrypt::{DEFAULT_COST, hash, verify};
use log::{info, warn};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

use crate::db::collections::USERS;
use crate::handlers::{db_error, parse_object_id};
use crate::models::user::{User, UserResponse};
use crate::state::app_state::AppState;
use crate::utils::jwt::{Claims, create_token};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Invalid credentials"
    }))
}

pub async fn login(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let users_collection = app_state.collection::<User>(USERS);

    let user = users_collection
        .find_one(doc! { "username": &req.username, "isActive": true })
        .await
        .map_err(db_error)?;

    let Some(mut user) = user else {
        warn!("Login attempt for unknown user '{}'", req.username);
        return Ok(invalid_credentials());
    };

    let password_matches = verify(&req.password, &user.password_hash)
        .map_err(|_| error::ErrorInternalServerError("Password verification failed"))?;
    if !password_matches {
        warn!("Wrong password for '{}'", req.username);
        return Ok(invalid_credentials());
    }

    let user_id = user.id.map(|id| id.to_hex()).unwrap_or_default();
    let token = create_token(&app_state.jwt_secret, &user_id, &user.username)
        .map_err(|e| error::ErrorInternalServerError(format!("Token generation failed: {}", e)))?;

    user.update_last_login();
    users_collection
        .update_one(
            doc! { "username": &user.username },
            doc! { "$set": { "lastLogin": user.last_login } },
        )
        .await
        .map_err(db_error)?;

    info!("Admin '{}' logged in", user.username);
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Create the first admin account from `ADMIN_USERNAME` / `ADMIN_PASSWORD`.
pub async fn create_initial_admin(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let users_collection = app_state.collection::<User>(USERS);

    let count = users_collection
        .count_documents(doc! {})
        .await
        .map_err(db_error)?;

    if count > 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Users already exist, cannot create initial admin"
        })));
    }

    let username = std::env::var("ADMIN_USERNAME")
        .map_err(|_| error::ErrorInternalServerError("ADMIN_USERNAME not set"))?;
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| error::ErrorInternalServerError("ADMIN_PASSWORD not set"))?;
    let email = std::env::var("ADMIN_EMAIL").ok();

    let password_hash = hash(password, DEFAULT_COST)
        .map_err(|e| error::ErrorInternalServerError(format!("Failed to hash password: {}", e)))?;

    let admin = User::new(username.clone(), email, password_hash);
    users_collection.insert_one(&admin).await.map_err(db_error)?;

    info!("Initial admin '{}' created", username);
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Admin created successfully",
        "username": username
    })))
}

/// Current admin, resolved from the token the middleware accepted.
pub async fn me(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let user_id = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.user_id.clone())
        .ok_or_else(|| error::ErrorUnauthorized("Authentication required"))?;
    let object_id = parse_object_id(&user_id)?;

    let user = app_state
        .collection::<User>(USERS)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
        .ok_or_else(|| error::ErrorNotFound("User not found"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
