rust_i18n::i18n!("locales", fallback = "de");

pub mod catalog;
pub mod db;
pub mod email;
pub mod engine;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod sessions;
pub mod statics;
pub mod utils;
pub mod views;

use axum::{middleware, Router};

use email::ResendMailer;
use services::access_request::AccessRequestService;
use sessions::Sessions;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub sessions: Sessions,
    pub access: AccessRequestService,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: db::Db, mailer: ResendMailer, secure_cookies: bool) -> Self {
        Self {
            access: AccessRequestService::new(db.clone(), mailer),
            db,
            sessions: Sessions::new(),
            secure_cookies,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::home::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::admin::routes())
        .layer(middleware::from_fn(csrf_check))
        .nest("/static", statics::routes())
        .with_state(state)
}

async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
