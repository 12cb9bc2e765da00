use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use serde_json::{Map, Value};
use validator::Validate;

use crate::db::collections::TOOLS;
use crate::handlers::{
    bad_request, db_error, not_found, now_millis, parse_object_id, respond, validation_failed,
};
use crate::models::tool::{
    Tool, active_filter, needs_favicon_refresh, next_order, toggled_active_expr,
};
use crate::state::app_state::AppState;
use crate::structs::query::AdminQuery;
use crate::structs::tool_request::CreateToolRequest;
use crate::utils::patch::merge_patch;

/// List tools, active ones only unless `?admin=true`.
pub async fn get_tools(
    app_state: web::Data<AppState>,
    query: web::Query<AdminQuery>,
) -> Result<HttpResponse> {
    let tools_collection = app_state.collection::<Tool>(TOOLS);

    let filter = if query.is_admin() {
        doc! {}
    } else {
        active_filter()
    };

    let tools = tools_collection
        .find(filter)
        .sort(doc! { "order": 1, "createdAt": -1 })
        .await
        .map_err(db_error)?
        .try_collect::<Vec<Tool>>()
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &tools)
}

pub async fn create_tool(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateToolRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let tools_collection = app_state.collection::<Tool>(TOOLS);

    let order = match req.order {
        Some(order) => order,
        None => {
            // Read-max-then-insert; concurrent creates may share an order.
            let last = tools_collection
                .find_one(doc! {})
                .sort(doc! { "order": -1 })
                .await
                .map_err(db_error)?;
            next_order(last.map(|t| t.order))
        }
    };

    let favicon_url = app_state.favicon.resolve(&req.link).await;

    let mut tool = Tool::new(
        req.title,
        req.description,
        req.link,
        req.icon,
        req.tag,
        order,
        favicon_url,
    );
    if let Some(is_active) = req.is_active {
        tool.is_active = is_active;
    }

    let result = tools_collection.insert_one(&tool).await.map_err(db_error)?;
    tool.id = result.inserted_id.as_object_id();
    info!("Created tool '{}' with order {}", tool.title, tool.order);

    respond(HttpResponse::Created(), &tool)
}

/// Partial update. The favicon is looked up again only when the link changes.
pub async fn update_tool(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let tools_collection = app_state.collection::<Tool>(TOOLS);

    let existing = match tools_collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
    {
        Some(tool) => tool,
        None => return Ok(not_found("Tool")),
    };

    let mut updated = match merge_patch(&existing, patch) {
        Ok(tool) => tool,
        Err(e) => return Ok(bad_request(format!("Invalid tool data: {}", e))),
    };
    if let Err(errors) = updated.validate() {
        return Ok(validation_failed(errors));
    }

    if needs_favicon_refresh(&existing, &updated) {
        updated.favicon_url = app_state.favicon.resolve(&updated.link).await;
    }
    updated.id = Some(object_id);
    updated.updated_at = now_millis();

    tools_collection
        .replace_one(doc! { "_id": object_id }, &updated)
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updated)
}

pub async fn toggle_tool(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let tools_collection = app_state.collection::<Tool>(TOOLS);

    let flip = vec![doc! {
        "$set": {
            "isActive": toggled_active_expr(),
            "updatedAt": now_millis(),
        }
    }];

    let toggled = tools_collection
        .find_one_and_update(doc! { "_id": object_id }, flip)
        .return_document(ReturnDocument::After)
        .await
        .map_err(db_error)?;

    match toggled {
        Some(tool) => {
            info!("Tool {} is now {}", object_id, if tool.is_active { "active" } else { "inactive" });
            respond(HttpResponse::Ok(), &tool)
        }
        None => Ok(not_found("Tool")),
    }
}

pub async fn delete_tool(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let tools_collection = app_state.collection::<Tool>(TOOLS);

    let result = tools_collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Ok(not_found("Tool"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Tool deleted successfully" })))
}
