//! Session auth: signup, login, logout, and the request-side helpers the
//! note views use to resolve the current user.
//!
//! A session token is issued at signup/login and travels back either as the
//! `session` cookie or an `Authorization: Bearer` header. Protected HTML-ish
//! views redirect anonymous requests to `/login?next=<path>` instead of
//! returning 401, matching the server-rendered-form flow.

use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::AppState;
use crate::models::User;

pub const SESSION_COOKIE: &str = "session";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/signup")
            .route(web::get().to(signup_page))
            .route(web::post().to(signup)),
    );
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_page))
            .route(web::post().to(login)),
    );
    cfg.service(web::resource("/logout").route(web::post().to(logout)));
}

fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Pull the session token from the cookie or the Authorization header.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_start_matches("Bearer ").to_string())
}

/// 302 to the login page, carrying the originally requested path.
pub fn login_redirect(next: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", format!("/login?next={}", urlencoding::encode(next))))
        .finish()
}

/// Resolve the requesting user or fail with the response to send instead:
/// a login redirect for anonymous requests, a 500 on database trouble.
pub fn require_user(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<User, HttpResponse> {
    let token = match session_token(req) {
        Some(t) => t,
        None => return Err(login_redirect(req.path())),
    };

    let session = match state.db.validate_session(&token) {
        Ok(Some(s)) => s,
        Ok(None) => return Err(login_redirect(req.path())),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            return Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })));
        }
    };

    match state.db.get_user(session.user_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(login_redirect(req.path())),
        Err(e) => {
            log::error!("User lookup error: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })))
        }
    }
}

// --- Pages ---

async fn signup_page() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "page": "signup",
        "fields": ["username", "password"]
    }))
}

async fn login_page() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "page": "login",
        "fields": ["username", "password"]
    }))
}

// --- Signup / login / logout ---

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

fn session_response(state: &web::Data<AppState>, user: User) -> HttpResponse {
    match state.db.create_session(user.id) {
        Ok(session) => {
            let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
                .path("/")
                .http_only(true)
                .finish();

            HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
                "token": session.token,
                "user": user
            }))
        }
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn signup(data: web::Data<AppState>, body: web::Form<Credentials>) -> impl Responder {
    match data.db.get_user_by_username(&body.username) {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Username already taken"
            }));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("User lookup error: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    }

    match data
        .db
        .create_user(&body.username, &hash_password(&body.password))
    {
        Ok(user) => session_response(&data, user),
        Err(e) => {
            log::error!("Failed to create user: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn login(data: web::Data<AppState>, body: web::Form<Credentials>) -> impl Responder {
    match data.db.get_user_by_username(&body.username) {
        Ok(Some(user)) if user.password_hash == hash_password(&body.password) => {
            session_response(&data, user)
        }
        Ok(_) => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid username or password"
        })),
        Err(e) => {
            log::error!("User lookup error: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(token) = session_token(&req) {
        if let Err(e) = data.db.delete_session(&token) {
            log::error!("Failed to delete session: {}", e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    use super::*;
    use crate::config::Config;
    use crate::db::Database;

    fn test_state(db: &Arc<Database>) -> web::Data<AppState> {
        web::Data::new(AppState {
            db: Arc::clone(db),
            config: Config {
                port: 0,
                database_url: ":memory:".to_string(),
            },
            started_at: std::time::Instant::now(),
        })
    }

    macro_rules! init_app {
        ($db:expr) => {
            test::init_service(App::new().app_data(test_state($db)).configure(config)).await
        };
    }

    fn credentials(username: &str, password: &str) -> Vec<(&'static str, String)> {
        vec![
            ("username", username.to_string()),
            ("password", password.to_string()),
        ]
    }

    #[actix_web::test]
    async fn test_signup_creates_user_and_session() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let app = init_app!(&db);

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_form(credentials("alice", "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let token = body["token"].as_str().unwrap();
        assert!(db.validate_session(token).unwrap().is_some());
        assert!(db.get_user_by_username("alice").unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_signup_rejects_taken_username() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let app = init_app!(&db);
        db.create_user("alice", "digest").unwrap();

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_form(credentials("alice", "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_login_checks_password() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let app = init_app!(&db);
        db.create_user("alice", &hash_password("secret")).unwrap();

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(credentials("alice", "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(credentials("alice", "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_logout_invalidates_session() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let app = init_app!(&db);
        let user = db.create_user("alice", "digest").unwrap();
        let session = db.create_session(user.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/logout")
            .insert_header(("Authorization", format!("Bearer {}", session.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(db.validate_session(&session.token).unwrap().is_none());
    }
}
