use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::IntoResponse,
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use maud::Markup;
use rust_i18n::t;
use serde::Deserialize;

use crate::{
    extractors::{IsHtmx, Locale, StudentGuard},
    names,
    rejections::{AppError, ResultExt},
    utils, views,
    views::login as login_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route(names::LOGIN_URL, post(login_post))
        .route(names::LOGOUT_URL, post(logout_post))
        .route(names::REQUEST_CODE_URL, post(request_code_post))
        .route(names::STUDY_GUIDE_URL, get(study_guide))
        .route(names::SET_LOCALE_URL, post(set_locale))
}

/// Entry point: logged-in students land wherever their session state
/// machine currently is, everyone else sees the access-code login.
async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
) -> Markup {
    if let Some(token) = jar
        .get(names::STUDENT_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        if let Some((title, body)) = super::quiz::state_view(&state.sessions, &token, &locale) {
            return views::render(is_htmx, title, body, &locale);
        }
    }

    views::render(
        is_htmx,
        "Login",
        login_views::login(login_views::LoginState::NoError, &locale),
        &locale,
    )
}

#[derive(Deserialize)]
struct LoginPost {
    code: String,
}

async fn login_post(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<LoginPost>,
) -> Result<axum::response::Response, AppError> {
    let valid = state
        .db
        .validate_access_code(body.code.trim())
        .await
        .reject("could not validate access code")?;

    if !valid {
        tracing::info!("rejected access code login attempt");
        // Inline error; the re-rendered form comes back with an empty input.
        return Ok(views::titled(
            "Login",
            login_views::login(login_views::LoginState::InvalidCode, &locale),
        )
        .into_response());
    }

    let token = state.sessions.login_student();
    let cookie = utils::cookie(names::STUDENT_SESSION_COOKIE_NAME, &token, state.secure_cookies);

    let page = views::titled("Start", crate::views::quiz::start_page(&locale));
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie.parse().reject("could not build session cookie")?,
    );

    Ok((headers, page).into_response())
}

async fn logout_post(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = jar
        .get(names::STUDENT_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        state.sessions.logout_student(&token);
    }

    let clear = utils::clear_cookie(names::STUDENT_SESSION_COOKIE_NAME, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear.parse().reject("could not build clear cookie")?);
    headers.insert("HX-Redirect", HeaderValue::from_static("/"));

    Ok((headers, ""))
}

#[derive(Deserialize)]
struct RequestCodePost {
    email: String,
}

/// Self-service code delivery. The response is the same no matter what
/// happened behind the scenes.
async fn request_code_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Locale(locale): Locale,
    Form(body): Form<RequestCodePost>,
) -> Markup {
    let address = client_address(&headers);
    state
        .access
        .request_code(&body.email, address.as_deref())
        .await;

    views::titled(
        &t!("login.request_sent_title", locale = &locale),
        login_views::request_code_sent(&locale),
    )
}

fn client_address(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    headers
        .get("cf-connecting-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

#[derive(Deserialize)]
struct SetLocaleBody {
    locale: String,
}

async fn set_locale(
    State(state): State<AppState>,
    Form(body): Form<SetLocaleBody>,
) -> Result<impl IntoResponse, AppError> {
    let locale = match body.locale.as_str() {
        "en" => "en",
        _ => "de",
    };
    let cookie = utils::cookie(names::LOCALE_COOKIE_NAME, locale, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().reject("could not build locale cookie")?);
    headers.insert("HX-Refresh", HeaderValue::from_static("true"));

    Ok((headers, ""))
}

async fn study_guide(
    StudentGuard(_token): StudentGuard,
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let content = state
        .db
        .fetch_study_guide()
        .await
        .reject("could not fetch study guide")?
        .ok_or(AppError::NotFound)?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf"),
            (
                CONTENT_DISPOSITION,
                r#"inline; filename="studienleitfaden.pdf""#,
            ),
        ],
        content,
    )
        .into_response())
}
