use actix_web::web;

use crate::handlers::auth_handlers::{create_initial_admin, login, me};
use crate::handlers::detailed_note_handlers::{
    create_detailed_note, delete_detailed_note, get_detailed_note, get_detailed_note_by_code,
    get_detailed_notes, update_detailed_note,
};
use crate::handlers::health_handlers::health_check;
use crate::handlers::note_handlers::{
    create_note, delete_note, get_note, get_notes, toggle_note_section, update_note,
};
use crate::handlers::offer_handlers::{
    create_offer, delete_offer, get_active_offers, get_offer, get_offer_codes, get_offers,
    toggle_offer, update_offer,
};
use crate::handlers::tool_handlers::{
    create_tool, delete_tool, get_tools, toggle_tool, update_tool,
};
use crate::handlers::update_handlers::{
    create_update, delete_update, edit_update, get_updates, toggle_update,
};

/// Configure the routes. Authentication is applied by the caller on the `/api` scope.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/init", web::post().to(create_initial_admin))
            .route("/me", web::get().to(me)),
    )
    .route("/health", web::get().to(health_check))
    .service(
        web::scope("/notes")
            .route("", web::get().to(get_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note))
            .route("/{id}/toggle/{section}", web::patch().to(toggle_note_section)),
    )
    .service(
        web::scope("/detailed-notes")
            .route("", web::get().to(get_detailed_notes))
            .route("", web::post().to(create_detailed_note))
            .route("/code/{notes_code}", web::get().to(get_detailed_note_by_code))
            .route("/{id}", web::get().to(get_detailed_note))
            .route("/{id}", web::put().to(update_detailed_note))
            .route("/{id}", web::delete().to(delete_detailed_note)),
    )
    .service(
        web::scope("/updates")
            .route("", web::get().to(get_updates))
            .route("", web::post().to(create_update))
            .route("/{id}", web::put().to(edit_update))
            .route("/{id}", web::delete().to(delete_update))
            .route("/{id}/toggle", web::patch().to(toggle_update)),
    )
    .service(
        web::scope("/tools")
            .route("", web::get().to(get_tools))
            .route("", web::post().to(create_tool))
            .route("/{id}", web::put().to(update_tool))
            .route("/{id}", web::delete().to(delete_tool))
            .route("/{id}/toggle", web::patch().to(toggle_tool)),
    )
    .service(
        // `/active` is registered before `/{id}` so it is not read as an id
        web::scope("/offers")
            .route("", web::get().to(get_offers))
            .route("", web::post().to(create_offer))
            .route("/active", web::get().to(get_active_offers))
            .route("/{id}", web::get().to(get_offer))
            .route("/{id}", web::put().to(update_offer))
            .route("/{id}", web::delete().to(delete_offer))
            .route("/{id}/codes", web::get().to(get_offer_codes))
            .route("/{id}/toggle", web::patch().to(toggle_offer)),
    );
}
