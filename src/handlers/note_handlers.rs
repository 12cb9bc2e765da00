use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use serde_json::{Map, Value};
use validator::Validate;

use crate::db::collections::NOTES;
use crate::handlers::{
    bad_request, db_error, not_found, now_millis, parse_object_id, respond, validation_failed,
};
use crate::models::flag::{StringFlag, toggled_expr};
use crate::models::note::{Note, NoteSection};
use crate::state::app_state::AppState;
use crate::structs::note_request::CreateNoteRequest;
use crate::utils::drive_link::convert_optional;
use crate::utils::patch::merge_patch;

fn convert_links(note: &mut Note) {
    note.notes_link = convert_optional(note.notes_link.take());
    note.quantum_link = convert_optional(note.quantum_link.take());
    note.pyq_link = convert_optional(note.pyq_link.take());
}

/// Every note is listed; the per-section flags decide what the site shows.
pub async fn get_notes(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let notes_collection = app_state.collection::<Note>(NOTES);

    let notes = notes_collection
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .await
        .map_err(db_error)?
        .try_collect::<Vec<Note>>()
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &notes)
}

pub async fn get_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let note = app_state
        .collection::<Note>(NOTES)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    match note {
        Some(note) => respond(HttpResponse::Ok(), &note),
        None => Ok(not_found("Note")),
    }
}

pub async fn create_note(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateNoteRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    let now = now_millis();
    let mut note = Note {
        id: None,
        title: req.title,
        description: req.description,
        notes_code: req.notes_code.trim().to_string(),
        subject: req.subject,
        branch: req.branch,
        semester: req.semester,
        thumbnail: req.thumbnail,
        notes_link: req.notes_link,
        quantum_link: req.quantum_link,
        pyq_link: req.pyq_link,
        notes_active: req.notes_active.unwrap_or(StringFlag(true)),
        quantum_active: req.quantum_active.unwrap_or(StringFlag(true)),
        pyq_active: req.pyq_active.unwrap_or(StringFlag(true)),
        created_at: now,
        updated_at: now,
    };
    convert_links(&mut note);

    let result = app_state
        .collection::<Note>(NOTES)
        .insert_one(&note)
        .await
        .map_err(db_error)?;
    note.id = result.inserted_id.as_object_id();
    info!("Created note {} ({})", note.notes_code, note.title);

    respond(HttpResponse::Created(), &note)
}

pub async fn update_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let notes_collection = app_state.collection::<Note>(NOTES);

    let existing = match notes_collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
    {
        Some(note) => note,
        None => return Ok(not_found("Note")),
    };

    let mut updated = match merge_patch(&existing, patch) {
        Ok(note) => note,
        Err(e) => return Ok(bad_request(format!("Invalid note data: {}", e))),
    };
    if let Err(errors) = updated.validate() {
        return Ok(validation_failed(errors));
    }
    convert_links(&mut updated);
    updated.id = Some(object_id);
    updated.updated_at = now_millis();

    notes_collection
        .replace_one(doc! { "_id": object_id }, &updated)
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updated)
}

/// Flip one of the `notesActive` / `quantumActive` / `pyqActive` flags.
pub async fn toggle_note_section(
    app_state: web::Data<AppState>,
    path: web::Path<(String, NoteSection)>,
) -> Result<HttpResponse> {
    let (id, section) = path.into_inner();
    let object_id = parse_object_id(&id)?;
    let field = section.flag_field();

    let mut set = doc! { "updatedAt": now_millis() };
    set.insert(field, toggled_expr(field, false));
    let flip = vec![doc! { "$set": set }];

    let toggled = app_state
        .collection::<Note>(NOTES)
        .find_one_and_update(doc! { "_id": object_id }, flip)
        .return_document(ReturnDocument::After)
        .await
        .map_err(db_error)?;

    match toggled {
        Some(note) => {
            info!(
                "Note {} {} set to {}",
                note.notes_code,
                field,
                note.section_active(section)
            );
            respond(HttpResponse::Ok(), &note)
        }
        None => Ok(not_found("Note")),
    }
}

pub async fn delete_note(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let result = app_state
        .collection::<Note>(NOTES)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Ok(not_found("Note"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Note deleted successfully" })))
}
