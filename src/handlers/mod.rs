pub mod auth_handlers;
pub mod detailed_note_handlers;
pub mod health_handlers;
pub mod note_handlers;
pub mod offer_handlers;
pub mod tool_handlers;
pub mod update_handlers;

use actix_web::{HttpResponse, error};
use mongodb::bson::oid::ObjectId;
use validator::ValidationErrors;

use crate::utils::api_json::api_json;

pub(crate) fn parse_object_id(raw: &str) -> actix_web::Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| error::ErrorBadRequest("Invalid ID format"))
}

pub(crate) fn db_error(e: mongodb::error::Error) -> actix_web::Error {
    log::error!("Database error: {}", e);
    error::ErrorInternalServerError(format!("Database error: {}", e))
}

pub(crate) fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("{} not found", what) }))
}

pub(crate) fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(errors)
}

pub(crate) fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.into() }))
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Reply with `value` serialized through [`api_json`].
pub(crate) fn respond<T: serde::Serialize>(
    mut builder: actix_web::HttpResponseBuilder,
    value: &T,
) -> actix_web::Result<HttpResponse> {
    let body = api_json(value)
        .map_err(|e| error::ErrorInternalServerError(format!("Serialization error: {}", e)))?;
    Ok(builder.json(body))
}
