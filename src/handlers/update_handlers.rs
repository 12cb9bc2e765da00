use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use serde_json::{Map, Value};
use validator::Validate;

use crate::db::collections::UPDATES;
use crate::handlers::{
    bad_request, db_error, not_found, now_millis, parse_object_id, respond, validation_failed,
};
use crate::models::flag::{on_filter, toggled_expr};
use crate::models::update::Update;
use crate::state::app_state::AppState;
use crate::structs::query::AdminQuery;
use crate::structs::update_request::CreateUpdateRequest;
use crate::utils::patch::merge_patch;

pub async fn get_updates(
    app_state: web::Data<AppState>,
    query: web::Query<AdminQuery>,
) -> Result<HttpResponse> {
    let filter = if query.is_admin() {
        doc! {}
    } else {
        on_filter("isActive", true)
    };

    let updates = app_state
        .collection::<Update>(UPDATES)
        .find(filter)
        .sort(doc! { "createdAt": -1 })
        .await
        .map_err(db_error)?
        .try_collect::<Vec<Update>>()
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updates)
}

pub async fn create_update(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateUpdateRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let mut update = Update::new(
        req.title,
        req.description,
        req.link,
        req.is_active.is_none_or(|flag| flag.is_on()),
    );

    let result = app_state
        .collection::<Update>(UPDATES)
        .insert_one(&update)
        .await
        .map_err(db_error)?;
    update.id = result.inserted_id.as_object_id();
    info!("Posted update '{}'", update.title);

    respond(HttpResponse::Created(), &update)
}

pub async fn edit_update(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let updates_collection = app_state.collection::<Update>(UPDATES);

    let existing = match updates_collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
    {
        Some(update) => update,
        None => return Ok(not_found("Update")),
    };

    let mut updated = match merge_patch(&existing, patch) {
        Ok(update) => update,
        Err(e) => return Ok(bad_request(format!("Invalid update data: {}", e))),
    };
    if let Err(errors) = updated.validate() {
        return Ok(validation_failed(errors));
    }
    updated.id = Some(object_id);
    updated.updated_at = now_millis();

    updates_collection
        .replace_one(doc! { "_id": object_id }, &updated)
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updated)
}

pub async fn toggle_update(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let flip = vec![doc! {
        "$set": {
            "isActive": toggled_expr("isActive", true),
            "updatedAt": now_millis(),
        }
    }];

    let toggled = app_state
        .collection::<Update>(UPDATES)
        .find_one_and_update(doc! { "_id": object_id }, flip)
        .return_document(ReturnDocument::After)
        .await
        .map_err(db_error)?;

    match toggled {
        Some(update) => respond(HttpResponse::Ok(), &update),
        None => Ok(not_found("Update")),
    }
}

pub async fn delete_update(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let result = app_state
        .collection::<Update>(UPDATES)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Ok(not_found("Update"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Update deleted successfully" })))
}
