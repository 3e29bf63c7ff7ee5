use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{html, Markup};

use crate::{names, views};

/// Application-level failures handlers can return. The response body is
/// always a terse, generic page; the cause lands in the log instead.
#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Input(&'static str),
    Unauthorized,
    Forbidden,
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Internal(context) => {
                tracing::error!("internal error: {context}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
            AppError::Input(context) => {
                tracing::warn!("input error: {context}");
                (StatusCode::BAD_REQUEST, "INPUT_ERROR")
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };

        (code, error_page(message)).into_response()
    }
}

fn error_page(message: &str) -> Markup {
    views::page(
        "Fehler",
        html! {
            h1 { (message) }
            p { a href="/" { "Zurück zum Start" } }
        },
        names::DEFAULT_LOCALE,
    )
}

/// Adapters used throughout the handlers: log the cause, hand the user a
/// generic failure.
pub trait ResultExt<T> {
    fn reject(self, context: &'static str) -> Result<T, AppError>;
    fn reject_input(self, context: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{context}: {e}");
            AppError::Internal(context)
        })
    }

    fn reject_input(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{context}: {e}");
            AppError::Input(context)
        })
    }
}
