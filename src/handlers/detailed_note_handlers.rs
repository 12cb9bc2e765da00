use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{Regex, doc};
use serde_json::{Map, Value};
use validator::Validate;

use crate::db::collections::DETAILED_NOTES;
use crate::handlers::{
    bad_request, db_error, not_found, now_millis, parse_object_id, respond, validation_failed,
};
use crate::models::detailed_note::{DetailedNote, NoteUnit};
use crate::models::flag::StringFlag;
use crate::state::app_state::AppState;
use crate::structs::note_request::CreateDetailedNoteRequest;
use crate::structs::query::DetailedNoteQuery;
use crate::utils::drive_link::convert_optional;
use crate::utils::patch::merge_patch;

/// Case-insensitive exact match on `notesCode`.
fn notes_code_filter(notes_code: &str) -> mongodb::bson::Document {
    let pattern = Regex {
        pattern: format!("^{}$", regex::escape(notes_code.trim())),
        options: "i".to_string(),
    };
    doc! { "notesCode": pattern }
}

fn convert_unit_links(units: &mut [NoteUnit]) {
    for unit in units {
        unit.link = convert_optional(unit.link.take());
    }
}

pub async fn get_detailed_notes(
    app_state: web::Data<AppState>,
    query: web::Query<DetailedNoteQuery>,
) -> Result<HttpResponse> {
    let filter = match query.notes_code.as_deref() {
        Some(code) if !code.trim().is_empty() => notes_code_filter(code),
        _ => doc! {},
    };

    let notes = app_state
        .collection::<DetailedNote>(DETAILED_NOTES)
        .find(filter)
        .sort(doc! { "createdAt": -1 })
        .await
        .map_err(db_error)?
        .try_collect::<Vec<DetailedNote>>()
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &notes)
}

pub async fn get_detailed_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let note = app_state
        .collection::<DetailedNote>(DETAILED_NOTES)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    match note {
        Some(note) => respond(HttpResponse::Ok(), &note),
        None => Ok(not_found("Detailed note")),
    }
}

pub async fn get_detailed_note_by_code(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let notes_code = path.into_inner();

    let note = app_state
        .collection::<DetailedNote>(DETAILED_NOTES)
        .find_one(notes_code_filter(&notes_code))
        .await
        .map_err(db_error)?;

    match note {
        Some(note) => respond(HttpResponse::Ok(), &note),
        None => Ok(not_found("Detailed note")),
    }
}

pub async fn create_detailed_note(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateDetailedNoteRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let now = now_millis();
    let mut note = DetailedNote {
        id: None,
        notes_code: req.notes_code.trim().to_string(),
        title: req.title,
        description: req.description,
        units: req.units,
        is_active: req.is_active.unwrap_or(StringFlag(true)),
        created_at: now,
        updated_at: now,
    };
    convert_unit_links(&mut note.units);

    let result = app_state
        .collection::<DetailedNote>(DETAILED_NOTES)
        .insert_one(&note)
        .await
        .map_err(db_error)?;
    note.id = result.inserted_id.as_object_id();
    info!("Created detailed note for {}", note.notes_code);

    respond(HttpResponse::Created(), &note)
}

pub async fn update_detailed_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let collection = app_state.collection::<DetailedNote>(DETAILED_NOTES);

    let existing = match collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
    {
        Some(note) => note,
        None => return Ok(not_found("Detailed note")),
    };

    let mut updated = match merge_patch(&existing, patch) {
        Ok(note) => note,
        Err(e) => return Ok(bad_request(format!("Invalid detailed note data: {}", e))),
    };
    if let Err(errors) = updated.validate() {
        return Ok(validation_failed(errors));
    }
    convert_unit_links(&mut updated.units);
    updated.id = Some(object_id);
    updated.updated_at = now_millis();

    collection
        .replace_one(doc! { "_id": object_id }, &updated)
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updated)
}

pub async fn delete_detailed_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let result = app_state
        .collection::<DetailedNote>(DETAILED_NOTES)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Ok(not_found("Detailed note"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Detailed note deleted successfully" })))
}
