use actix_web::{HttpResponse, Result, web};
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{Document, doc};
use mongodb::options::ReturnDocument;
use serde_json::{Map, Value};

use crate::db::collections::OFFERS;
use crate::handlers::{bad_request, db_error, not_found, now_millis, parse_object_id, respond};
use crate::models::offer::{Offer, OfferStatus};
use crate::state::app_state::AppState;
use crate::structs::query::AdminQuery;
use crate::utils::patch::merge_patch;

fn offer_sort() -> Document {
    doc! { "priorityOrder": 1, "createdAt": -1 }
}

pub async fn get_offers(
    app_state: web::Data<AppState>,
    query: web::Query<AdminQuery>,
) -> Result<HttpResponse> {
    let filter = if query.is_admin() {
        doc! {}
    } else {
        doc! { "status": OfferStatus::Active.as_str() }
    };

    let offers = app_state
        .collection::<Offer>(OFFERS)
        .find(filter)
        .sort(offer_sort())
        .await
        .map_err(db_error)?
        .try_collect::<Vec<Offer>>()
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &offers)
}

/// Offers that are switched on and inside their date window right now.
pub async fn get_active_offers(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let now = now_millis();

    let offers = app_state
        .collection::<Offer>(OFFERS)
        .find(doc! { "status": OfferStatus::Active.as_str() })
        .sort(offer_sort())
        .await
        .map_err(db_error)?
        .try_collect::<Vec<Offer>>()
        .await
        .map_err(db_error)?;

    let live: Vec<Offer> = offers.into_iter().filter(|o| o.is_live(now)).collect();
    respond(HttpResponse::Ok(), &live)
}

pub async fn get_offer(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let offer = app_state
        .collection::<Offer>(OFFERS)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    match offer {
        Some(offer) => respond(HttpResponse::Ok(), &offer),
        None => Ok(not_found("Offer")),
    }
}

/// The ordered code sequence the carousel cycles through.
pub async fn get_offer_codes(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let offer = app_state
        .collection::<Offer>(OFFERS)
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    match offer {
        Some(offer) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "offerId": object_id.to_hex(),
            "loginRequired": offer.login_required,
            "codes": offer.code_sequence(),
        }))),
        None => Ok(not_found("Offer")),
    }
}

pub async fn create_offer(
    app_state: web::Data<AppState>,
    web::Json(mut offer): web::Json<Offer>,
) -> Result<HttpResponse> {
    offer.normalize_codes();
    if let Err(message) = offer.check_invariants() {
        return Ok(bad_request(message));
    }

    let now = now_millis();
    offer.id = None;
    offer.total_usage_count = 0;
    offer.created_at = now;
    offer.updated_at = now;

    let result = app_state
        .collection::<Offer>(OFFERS)
        .insert_one(&offer)
        .await
        .map_err(db_error)?;
    offer.id = result.inserted_id.as_object_id();
    info!(
        "Created {:?} offer '{}' with {} code(s)",
        offer.offer_type,
        offer.title,
        offer.code_sequence().len()
    );

    respond(HttpResponse::Created(), &offer)
}

pub async fn update_offer(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(patch): web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;
    let offers_collection = app_state.collection::<Offer>(OFFERS);

    let existing = match offers_collection
        .find_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?
    {
        Some(offer) => offer,
        None => return Ok(not_found("Offer")),
    };

    let mut updated = match merge_patch(&existing, patch) {
        Ok(offer) => offer,
        Err(e) => return Ok(bad_request(format!("Invalid offer data: {}", e))),
    };
    updated.normalize_codes();
    if let Err(message) = updated.check_invariants() {
        return Ok(bad_request(message));
    }
    updated.id = Some(object_id);
    updated.updated_at = now_millis();

    offers_collection
        .replace_one(doc! { "_id": object_id }, &updated)
        .await
        .map_err(db_error)?;

    respond(HttpResponse::Ok(), &updated)
}

/// Switch an offer between active and inactive.
pub async fn toggle_offer(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let flip = vec![doc! {
        "$set": {
            "status": { "$cond": [{ "$eq": ["$status", "active"] }, "inactive", "active"] },
            "updatedAt": now_millis(),
        }
    }];

    let toggled = app_state
        .collection::<Offer>(OFFERS)
        .find_one_and_update(doc! { "_id": object_id }, flip)
        .return_document(ReturnDocument::After)
        .await
        .map_err(db_error)?;

    match toggled {
        Some(offer) => {
            info!("Offer {} is now {}", object_id, offer.status.as_str());
            respond(HttpResponse::Ok(), &offer)
        }
        None => Ok(not_found("Offer")),
    }
}

pub async fn delete_offer(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let object_id = parse_object_id(&path.into_inner())?;

    let result = app_state
        .collection::<Offer>(OFFERS)
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(db_error)?;

    if result.deleted_count == 0 {
        return Ok(not_found("Offer"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Offer deleted successfully" })))
}
