//! Note views: list, add, detail, edit, delete.
//!
//! Every slug-keyed view resolves the note through a lookup scoped to the
//! requesting user, so a non-owner gets the same 404 as for a slug that was
//! never created. Writes go through `NoteForm::clean` and redirect to the
//! success page.

use actix_web::{HttpRequest, HttpResponse, Responder, web};

use crate::AppState;
use crate::controllers::auth::require_user;
use crate::models::{Note, User};
use crate::notes::form::{FormError, NoteForm};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notes")
            .route("", web::get().to(list))
            .route("/add", web::get().to(add_page))
            .route("/add", web::post().to(add))
            .route("/{slug}", web::get().to(detail))
            .route("/{slug}/edit", web::get().to(edit_page))
            .route("/{slug}/edit", web::post().to(edit))
            .route("/{slug}/delete", web::get().to(delete_page))
            .route("/{slug}/delete", web::post().to(delete)),
    );
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Note not found"
    }))
}

fn db_error(e: rusqlite::Error) -> HttpResponse {
    log::error!("Database error: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": format!("Database error: {}", e)
    }))
}

fn form_errors(field: &str, message: &str) -> HttpResponse {
    let mut errors = serde_json::Map::new();
    errors.insert(field.to_string(), serde_json::Value::from(message));
    HttpResponse::BadRequest().json(serde_json::json!({
        "errors": errors
    }))
}

fn redirect_to_done() -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", "/done"))
        .finish()
}

/// Ownership guard: the note with this slug, but only if the requester owns
/// it. Anything else is a 404.
fn owned_note(state: &web::Data<AppState>, user: &User, slug: &str) -> Result<Note, HttpResponse> {
    match state.db.get_note_for_author(slug, user.id) {
        Ok(Some(note)) => Ok(note),
        Ok(None) => Err(not_found()),
        Err(e) => Err(db_error(e)),
    }
}

// --- List ---

async fn list(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match data.db.list_notes_for_author(user.id) {
        Ok(notes) => HttpResponse::Ok().json(serde_json::json!({
            "notes": notes
        })),
        Err(e) => db_error(e),
    }
}

// --- Add ---

async fn add_page(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = require_user(&data, &req) {
        return resp;
    }

    HttpResponse::Ok().json(serde_json::json!({
        "page": "add",
        "fields": ["title", "text", "slug"]
    }))
}

async fn add(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<NoteForm>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let cleaned = match form.clean(&data.db, None) {
        Ok(c) => c,
        Err(FormError::Invalid(err)) => return form_errors(err.field, &err.message),
        Err(FormError::Db(e)) => return db_error(e),
    };

    match data
        .db
        .create_note(&cleaned.title, &cleaned.text, &cleaned.slug, user.id)
    {
        Ok(note) => {
            log::info!("User {} created note '{}'", user.username, note.slug);
            redirect_to_done()
        }
        Err(e) => db_error(e),
    }
}

// --- Detail ---

async fn detail(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match owned_note(&data, &user, &path) {
        Ok(note) => HttpResponse::Ok().json(serde_json::json!({
            "note": note
        })),
        Err(resp) => resp,
    }
}

// --- Edit ---

async fn edit_page(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match owned_note(&data, &user, &path) {
        Ok(note) => HttpResponse::Ok().json(serde_json::json!({
            "page": "edit",
            "note": note
        })),
        Err(resp) => resp,
    }
}

async fn edit(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<NoteForm>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let note = match owned_note(&data, &user, &path) {
        Ok(n) => n,
        Err(resp) => return resp,
    };

    let cleaned = match form.clean(&data.db, Some(note.id)) {
        Ok(c) => c,
        Err(FormError::Invalid(err)) => return form_errors(err.field, &err.message),
        Err(FormError::Db(e)) => return db_error(e),
    };

    match data
        .db
        .update_note(note.id, &cleaned.title, &cleaned.text, &cleaned.slug)
    {
        Ok(true) => redirect_to_done(),
        Ok(false) => not_found(),
        Err(e) => db_error(e),
    }
}

// --- Delete ---

async fn delete_page(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match owned_note(&data, &user, &path) {
        Ok(note) => HttpResponse::Ok().json(serde_json::json!({
            "page": "delete",
            "note": { "slug": note.slug, "title": note.title }
        })),
        Err(resp) => resp,
    }
}

async fn delete(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let note = match owned_note(&data, &user, &path) {
        Ok(n) => n,
        Err(resp) => return resp,
    };

    match data.db.delete_note(note.id) {
        Ok(true) => {
            log::info!("User {} deleted note '{}'", user.username, note.slug);
            redirect_to_done()
        }
        Ok(false) => not_found(),
        Err(e) => db_error(e),
    }
}
