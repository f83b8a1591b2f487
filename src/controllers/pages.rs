//! Public home page and the post-write success page.

use actix_web::{HttpRequest, HttpResponse, Responder, web};

use crate::AppState;
use crate::controllers::auth::require_user;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)));
    cfg.service(web::resource("/done").route(web::get().to(done)));
}

async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "page": "home"
    }))
}

/// Landing page after a successful create/edit/delete.
async fn done(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match require_user(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(serde_json::json!({
        "page": "done",
        "user": user.username
    }))
}
