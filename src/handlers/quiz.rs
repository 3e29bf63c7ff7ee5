use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Router,
};
use maud::Markup;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_i18n::t;
use serde::Deserialize;

use crate::{
    engine::SessionState,
    extractors::{Locale, StudentGuard},
    models::Verband,
    names,
    rejections::AppError,
    sessions::Sessions,
    views,
    views::quiz as quiz_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::START_QUIZ_URL, post(start_quiz))
        .route("/question/{idx}", get(question_page))
        .route(names::SELECT_ANSWER_URL, post(select_answer))
        .route(names::SUBMIT_QUIZ_URL, post(submit_quiz))
        .route(names::RESTART_URL, post(restart))
        .route(names::RESULTS_URL, get(results_page))
}

/// Render whatever screen the student's state machine is on. `None` when
/// the token no longer maps to a session.
pub(crate) fn state_view(
    sessions: &Sessions,
    token: &str,
    locale: &str,
) -> Option<(&'static str, Markup)> {
    sessions.with_student(token, |session| match session {
        SessionState::Config => ("Start", quiz_views::start_page(locale)),
        SessionState::Quiz(run) => (
            "Quiz",
            quiz_views::question(run, run.current_index(), locale),
        ),
        SessionState::Results(completed) => ("Ergebnis", quiz_views::results(completed, locale)),
    })
}

#[derive(Deserialize)]
struct StartQuizBody {
    #[serde(default = "default_question_count")]
    question_count: i64,
    #[serde(default)]
    verband: Option<String>,
}

fn default_question_count() -> i64 {
    names::DEFAULT_QUESTION_COUNT
}

async fn start_quiz(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<StartQuizBody>,
) -> Result<Markup, AppError> {
    let count = body
        .question_count
        .clamp(names::MIN_QUESTION_COUNT, names::MAX_QUESTION_COUNT);
    let verband = body.verband.as_deref().and_then(Verband::parse);

    // A failed fetch leaves the session in config; the overlay offers the
    // way back.
    let questions = match state.db.fetch_random_questions(count, verband).await {
        Ok(questions) => questions,
        Err(e) => {
            tracing::error!("could not fetch questions: {e}");
            return Ok(views::titled(
                "Fehler",
                quiz_views::load_error(&t!("quiz.load_failed", locale = &locale), &locale),
            ));
        }
    };

    if questions.is_empty() {
        return Ok(views::titled(
            "Fehler",
            quiz_views::load_error(&t!("quiz.no_questions", locale = &locale), &locale),
        ));
    }

    let page = state
        .sessions
        .with_student(&token, |session| -> Result<Markup, AppError> {
            session.restart();
            let mut rng = StdRng::seed_from_u64(rand::random());
            session
                .start(questions, &mut rng)
                .map_err(|_| AppError::Internal("could not start quiz"))?;
            let run = session
                .run()
                .map_err(|_| AppError::Internal("quiz did not start"))?;
            Ok(quiz_views::question(run, 0, &locale))
        })
        .ok_or(AppError::Unauthorized)??;

    Ok(views::titled("Quiz", page))
}

async fn question_page(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Path(idx): Path<usize>,
) -> Result<Markup, AppError> {
    let page = state
        .sessions
        .with_student(&token, |session| {
            session.goto(idx)?;
            let run = session.run()?;
            Ok(quiz_views::question(run, idx, &locale))
        })
        .ok_or(AppError::Unauthorized)?
        .map_err(|_: crate::engine::TransitionError| AppError::NotFound)?;

    Ok(views::titled("Quiz", page))
}

#[derive(Deserialize)]
struct SelectAnswerBody {
    question_idx: usize,
    option_idx: usize,
}

async fn select_answer(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(body): Form<SelectAnswerBody>,
) -> Result<Markup, AppError> {
    let page = state
        .sessions
        .with_student(&token, |session| {
            session.select_answer(body.question_idx, body.option_idx)?;
            session.goto(body.question_idx)?;
            let run = session.run()?;
            Ok(quiz_views::question(run, body.question_idx, &locale))
        })
        .ok_or(AppError::Unauthorized)?
        .map_err(|e: crate::engine::TransitionError| {
            tracing::warn!("rejected selection: {e}");
            AppError::Input("invalid selection")
        })?;

    Ok(views::titled("Quiz", page))
}

async fn submit_quiz(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let page = state
        .sessions
        .with_student(&token, |session| {
            match session.submit_confirmed() {
                Ok(()) => {}
                // Double-submit after finishing: show the frozen results.
                Err(_) if session.results().is_some() => {}
                Err(e) => return Err(e),
            }
            session
                .results()
                .map(|completed| quiz_views::results(completed, &locale))
                .ok_or(crate::engine::TransitionError::NotInQuiz)
        })
        .ok_or(AppError::Unauthorized)?
        .map_err(|_| AppError::Input("no quiz to submit"))?;

    Ok(views::titled("Ergebnis", page))
}

async fn restart(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let page = state
        .sessions
        .with_student(&token, |session| {
            session.restart();
            quiz_views::start_page(&locale)
        })
        .ok_or(AppError::Unauthorized)?;

    Ok(views::titled("Start", page))
}

async fn results_page(
    StudentGuard(token): StudentGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let (title, page) =
        state_view(&state.sessions, &token, &locale).ok_or(AppError::Unauthorized)?;
    Ok(views::titled(title, page))
}
