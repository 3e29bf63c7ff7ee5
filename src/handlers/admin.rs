use axum::{
    extract::{Multipart, Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::IntoResponse,
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use maud::Markup;
use rand::Rng;
use rust_i18n::t;
use serde::Deserialize;

use crate::{
    catalog::{self, QuestionFilter},
    engine,
    extractors::{AdminGuard, IsHtmx, Locale},
    models::{Question, QuestionType, Verband},
    names,
    rejections::{AppError, ResultExt},
    utils, views,
    views::admin::{self as admin_views, AdminTab, Flash},
    views::login as login_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_URL, get(admin_home))
        .route(names::ADMIN_LOGIN_URL, post(admin_login_post))
        .route(names::ADMIN_LOGOUT_URL, post(admin_logout_post))
        .route(
            names::ADMIN_QUESTIONS_URL,
            get(questions_tab).post(create_question),
        )
        .route("/admin/questions/new", get(new_question_form))
        .route("/admin/questions/{id}/edit", get(edit_question_form))
        .route("/admin/questions/{id}", post(update_question))
        .route("/admin/questions/{id}/delete", post(delete_question))
        .route("/admin/questions/delete-bulk", post(delete_questions_bulk))
        .route(names::ADMIN_IMPORT_URL, post(import_questions))
        .route(names::ADMIN_EXPORT_URL, get(export_csv))
        .route(names::ADMIN_CATALOG_URL, get(catalog_page))
        .route(
            names::ADMIN_ACCESS_CODES_URL,
            get(access_codes_tab).post(create_access_code),
        )
        .route("/admin/access-codes/{id}/toggle", post(toggle_access_code))
        .route("/admin/access-codes/{id}/delete", post(delete_access_code))
        .route(names::ADMIN_STUDY_GUIDE_URL, post(upload_study_guide))
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

async fn admin_home(
    State(state): State<AppState>,
    jar: CookieJar,
    IsHtmx(is_htmx): IsHtmx,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let logged_in = jar
        .get(names::ADMIN_SESSION_COOKIE_NAME)
        .is_some_and(|c| state.sessions.is_admin(c.value()));

    if logged_in {
        let body = questions_view(&state, QuestionFilter::default(), None, &locale).await?;
        return Ok(views::render(is_htmx, "Admin", body, &locale));
    }

    Ok(views::render(
        is_htmx,
        "Admin Login",
        login_views::admin_login(login_views::AdminLoginState::NoError, &locale),
        &locale,
    ))
}

#[derive(Deserialize)]
struct AdminLoginPost {
    username: String,
    password: String,
}

async fn admin_login_post(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<AdminLoginPost>,
) -> Result<axum::response::Response, AppError> {
    let valid = state
        .db
        .validate_admin_credentials(body.username.trim(), &body.password)
        .await
        .reject("could not validate admin credentials")?;

    if !valid {
        tracing::warn!("rejected admin login for '{}'", body.username);
        return Ok(views::titled(
            "Admin Login",
            login_views::admin_login(login_views::AdminLoginState::InvalidCredentials, &locale),
        )
        .into_response());
    }

    let token = state.sessions.login_admin();
    let cookie = utils::cookie(names::ADMIN_SESSION_COOKIE_NAME, &token, state.secure_cookies);

    let body = questions_view(&state, QuestionFilter::default(), None, &locale).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie.parse().reject("could not build admin cookie")?,
    );

    Ok((headers, views::titled("Admin", body)).into_response())
}

async fn admin_logout_post(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = jar.get(names::ADMIN_SESSION_COOKIE_NAME).map(|c| c.value()) {
        state.sessions.logout_admin(token);
    }

    let clear = utils::clear_cookie(names::ADMIN_SESSION_COOKIE_NAME, state.secure_cookies);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear.parse().reject("could not build clear cookie")?);
    headers.insert("HX-Redirect", HeaderValue::from_static(names::ADMIN_URL));

    Ok((headers, ""))
}

// ---------------------------------------------------------------------------
// Question manager
// ---------------------------------------------------------------------------

async fn questions_view(
    state: &AppState,
    filter: QuestionFilter,
    flash: Option<Flash>,
    locale: &str,
) -> Result<Markup, AppError> {
    let all = state
        .db
        .fetch_all_questions()
        .await
        .reject("could not fetch questions")?;

    let data = admin_views::QuestionTableData {
        questions: catalog::filter_and_sort(&all, &filter),
        categories: catalog::categories(&all),
        filter,
        flash,
    };

    Ok(admin_views::panel(
        AdminTab::Questions,
        admin_views::questions_tab(data, locale),
        locale,
    ))
}

async fn questions_tab(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Query(filter): Query<QuestionFilter>,
) -> Result<Markup, AppError> {
    let body = questions_view(&state, filter, None, &locale).await?;
    Ok(views::titled("Admin", body))
}

async fn new_question_form(
    AdminGuard(_token): AdminGuard,
    Locale(locale): Locale,
) -> Markup {
    views::titled(
        "Admin",
        admin_views::question_form(None, None, &locale),
    )
}

async fn edit_question_form(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let question = state
        .db
        .get_question(id)
        .await
        .reject("could not fetch question")?
        .ok_or(AppError::NotFound)?;

    Ok(views::titled(
        "Admin",
        admin_views::question_form(Some(&question), None, &locale),
    ))
}

/// Up to eight option/checkbox pairs plus the shared fields, matching the
/// edit form.
#[derive(Deserialize)]
struct QuestionFormBody {
    question_text: String,
    #[serde(default)]
    category: String,
    question_type: String,
    verband: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    option_1: String,
    #[serde(default)]
    option_2: String,
    #[serde(default)]
    option_3: String,
    #[serde(default)]
    option_4: String,
    #[serde(default)]
    option_5: String,
    #[serde(default)]
    option_6: String,
    #[serde(default)]
    option_7: String,
    #[serde(default)]
    option_8: String,
    #[serde(default)]
    correct_1: Option<String>,
    #[serde(default)]
    correct_2: Option<String>,
    #[serde(default)]
    correct_3: Option<String>,
    #[serde(default)]
    correct_4: Option<String>,
    #[serde(default)]
    correct_5: Option<String>,
    #[serde(default)]
    correct_6: Option<String>,
    #[serde(default)]
    correct_7: Option<String>,
    #[serde(default)]
    correct_8: Option<String>,
}

impl QuestionFormBody {
    fn into_question(self, id: Option<i32>) -> Question {
        let entries = [
            (self.option_1, self.correct_1.is_some()),
            (self.option_2, self.correct_2.is_some()),
            (self.option_3, self.correct_3.is_some()),
            (self.option_4, self.correct_4.is_some()),
            (self.option_5, self.correct_5.is_some()),
            (self.option_6, self.correct_6.is_some()),
            (self.option_7, self.correct_7.is_some()),
            (self.option_8, self.correct_8.is_some()),
        ];

        let mut options = Vec::new();
        let mut correct_answer_indices = Vec::new();
        for (text, correct) in entries {
            let text = engine::normalize(&text);
            if text.is_empty() {
                continue;
            }
            if correct {
                correct_answer_indices.push(options.len());
            }
            options.push(text);
        }

        let question_type = QuestionType::parse(&self.question_type);
        if question_type == QuestionType::Single {
            // Switching to Single keeps at most the first marked answer.
            correct_answer_indices = engine::clamp_to_single(&correct_answer_indices);
        }

        let category = engine::normalize(&self.category);
        let image_url = self.image_url.trim().to_string();

        Question {
            id,
            question_text: engine::normalize(&self.question_text),
            options,
            correct_answer_indices,
            category: (!category.is_empty()).then_some(category),
            question_type,
            verband: Verband::parse(&self.verband),
            image_url: (!image_url.is_empty()).then_some(image_url),
        }
    }
}

fn validate_question(question: &Question) -> bool {
    !question.question_text.is_empty()
        && question.options.len() >= 2
        && !question.correct_answer_indices.is_empty()
}

async fn create_question(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<QuestionFormBody>,
) -> Result<Markup, AppError> {
    save_question(state, body.into_question(None), locale).await
}

async fn update_question(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
    Form(body): Form<QuestionFormBody>,
) -> Result<Markup, AppError> {
    save_question(state, body.into_question(Some(id)), locale).await
}

async fn save_question(
    state: AppState,
    question: Question,
    locale: String,
) -> Result<Markup, AppError> {
    if !validate_question(&question) {
        let error = t!("admin.form_invalid", locale = &locale).to_string();
        return Ok(views::titled(
            "Admin",
            admin_views::question_form(Some(&question), Some(&error), &locale),
        ));
    }

    let is_update = question.id.is_some();
    let result = if is_update {
        state.db.update_question(&question).await
    } else {
        state.db.create_question(&question).await
    };

    let flash = match result {
        Ok(_) if is_update => Flash::Success(t!("admin.updated", locale = &locale).to_string()),
        Ok(_) => Flash::Success(t!("admin.created", locale = &locale).to_string()),
        Err(e) => {
            tracing::error!("could not save question: {e}");
            Flash::Error(t!("admin.save_failed", locale = &locale).to_string())
        }
    };

    let body = questions_view(&state, QuestionFilter::default(), Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}

async fn delete_question(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let flash = match state.db.delete_question(id).await {
        Ok(()) => Flash::Success(t!("admin.deleted", locale = &locale).to_string()),
        Err(e) => {
            tracing::error!("could not delete question {id}: {e}");
            Flash::Error(t!("admin.delete_failed", locale = &locale).to_string())
        }
    };

    let body = questions_view(&state, QuestionFilter::default(), Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}

async fn delete_questions_bulk(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    body: Bytes,
) -> Result<Markup, AppError> {
    let ids: Vec<i32> = super::form_pairs(&body)?
        .into_iter()
        .filter(|(key, _)| key == "ids")
        .filter_map(|(_, value)| value.parse().ok())
        .collect();

    let flash = if ids.is_empty() {
        Flash::Error(t!("admin.nothing_selected", locale = &locale).to_string())
    } else {
        match state.db.delete_questions(&ids).await {
            Ok(()) => Flash::Success(
                t!("admin.bulk_deleted", count = ids.len(), locale = &locale).to_string(),
            ),
            Err(e) => {
                tracing::error!("could not bulk delete questions: {e}");
                Flash::Error(t!("admin.delete_failed", locale = &locale).to_string())
            }
        }
    };

    let body = questions_view(&state, QuestionFilter::default(), Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

async fn import_questions(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut file: Option<Bytes> = None;
    let mut verband: Option<Verband> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("could not read upload")?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                file = Some(field.bytes().await.reject_input("could not read file")?);
            }
            Some("verband") => {
                let value = field.text().await.reject_input("could not read verband")?;
                verband = Verband::parse(&value);
            }
            _ => {}
        }
    }

    let (Some(file), Some(verband)) = (file, verband) else {
        return Err(AppError::Input("import needs a file and a verband"));
    };

    let flash = match catalog::parse_import(&file, verband) {
        Ok(outcome) => match state.db.insert_questions(&outcome.questions).await {
            Ok(count) => {
                if outcome.skipped > 0 {
                    tracing::warn!("import skipped {} malformed rows", outcome.skipped);
                }
                Flash::Success(t!("admin.imported", count = count, locale = &locale).to_string())
            }
            Err(e) => {
                tracing::error!("could not store imported questions: {e}");
                Flash::Error(t!("admin.import_failed", locale = &locale).to_string())
            }
        },
        Err(e) => {
            tracing::warn!("import rejected: {e}");
            Flash::Error(t!("admin.import_empty", locale = &locale).to_string())
        }
    };

    let body = questions_view(&state, QuestionFilter::default(), Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}

async fn export_csv(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let questions = state
        .db
        .fetch_all_questions()
        .await
        .reject("could not fetch questions")?;

    let csv = catalog::export_csv(&questions).reject("could not serialize catalog")?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                r#"attachment; filename="fragen-export.csv""#,
            ),
        ],
        csv,
    )
        .into_response())
}

async fn catalog_page(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let questions = state
        .db
        .fetch_all_questions()
        .await
        .reject("could not fetch questions")?;

    Ok(admin_views::catalog_page(&questions, &locale))
}

// ---------------------------------------------------------------------------
// Access codes
// ---------------------------------------------------------------------------

const CODE_ADJECTIVES: &[&str] = &[
    "BRAV",
    "FRECH",
    "FRÖHLICH",
    "VERSPIELT",
    "TREU",
    "CHARMANT",
    "CLEVER",
    "MUTIG",
    "LIEB",
    "TAPFER",
    "NEUGIERIG",
    "GLÜCKLICH",
    "FLAUSCHIG",
    "WACH",
    "ENTSPANNT",
    "SOUVERÄN",
    "ZUVERLÄSSIG",
    "LERNFREUDIG",
];

const CODE_NOUNS: &[&str] = &[
    "PFOTE",
    "FELLNASE",
    "WUFF",
    "WELPE",
    "SCHNAUZE",
    "LECKERLI",
    "KNOCHEN",
    "SPIELZEUG",
    "APPORT",
    "TRAIL",
    "DUMMY",
    "HUNDEWIESE",
    "GRUPPE",
    "TRAINING",
    "CLICKER",
    "LEINE",
    "HALSBAND",
];

/// Codes are meant to be read aloud or typed from a letter, so they are
/// built from words instead of random characters.
fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    let adjective = CODE_ADJECTIVES[rng.gen_range(0..CODE_ADJECTIVES.len())];
    let noun = CODE_NOUNS[rng.gen_range(0..CODE_NOUNS.len())];
    let number: u32 = rng.gen_range(100..1000);
    format!("{adjective}-{noun}-{number}")
}

async fn access_codes_view(
    state: &AppState,
    flash: Option<Flash>,
    locale: &str,
) -> Result<Markup, AppError> {
    let codes = state
        .db
        .fetch_all_access_codes()
        .await
        .reject("could not fetch access codes")?;

    Ok(admin_views::panel(
        AdminTab::AccessCodes,
        admin_views::access_codes_tab(admin_views::AccessCodeTableData { codes, flash }, locale),
        locale,
    ))
}

async fn access_codes_tab(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let body = access_codes_view(&state, None, &locale).await?;
    Ok(views::titled("Admin", body))
}

#[derive(Deserialize)]
struct CreateAccessCodePost {
    student_name: String,
    email: String,
}

async fn create_access_code(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<CreateAccessCodePost>,
) -> Result<Markup, AppError> {
    let student_name = body.student_name.trim();
    let email = body.email.trim().to_lowercase();

    let flash = if student_name.is_empty() || email.is_empty() {
        Flash::Error(t!("admin.code_fields_required", locale = &locale).to_string())
    } else {
        let code = generate_access_code();
        match state
            .db
            .create_access_code(&code, Some(student_name), &email)
            .await
        {
            Ok(created) => Flash::Success(
                t!("admin.code_create_success", code = created.code, locale = &locale).to_string(),
            ),
            Err(e) => {
                tracing::error!("could not create access code: {e}");
                Flash::Error(t!("admin.code_create_failed", locale = &locale).to_string())
            }
        }
    };

    let body = access_codes_view(&state, Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}

/// Optimistic toggle: the switch flips in the browser immediately; the
/// re-rendered table reflects the stored state, so a rejected update
/// snaps the switch back.
async fn toggle_access_code(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let flash = match state.db.toggle_access_code_active(id).await {
        Ok(_) => None,
        Err(e) => {
            tracing::error!("could not toggle access code {id}: {e}");
            Some(Flash::Error(
                t!("admin.code_toggle_failed", locale = &locale).to_string(),
            ))
        }
    };

    let body = access_codes_view(&state, flash, &locale).await?;
    Ok(views::titled("Admin", body))
}

async fn delete_access_code(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let flash = match state.db.delete_access_code(id).await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!("could not delete access code {id}: {e}");
            Some(Flash::Error(
                t!("admin.code_delete_failed", locale = &locale).to_string(),
            ))
        }
    };

    let body = access_codes_view(&state, flash, &locale).await?;
    Ok(views::titled("Admin", body))
}

// ---------------------------------------------------------------------------
// Study guide
// ---------------------------------------------------------------------------

async fn upload_study_guide(
    AdminGuard(_token): AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("could not read upload")?
    {
        let name = field.name().map(str::to_string);
        if name.as_deref() == Some("file") {
            file = Some(field.bytes().await.reject_input("could not read file")?);
        }
    }

    let Some(file) = file else {
        return Err(AppError::Input("upload needs a file"));
    };

    let flash = match state.db.upload_study_guide(&file).await {
        Ok(()) => Flash::Success(t!("admin.guide_uploaded", locale = &locale).to_string()),
        Err(e) => {
            tracing::error!("could not store study guide: {e}");
            Flash::Error(t!("admin.guide_upload_failed", locale = &locale).to_string())
        }
    };

    let body = questions_view(&state, QuestionFilter::default(), Some(flash), &locale).await?;
    Ok(views::titled("Admin", body))
}
