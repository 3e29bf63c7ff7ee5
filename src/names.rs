pub const LOGIN_URL: &str = "/login";
pub const LOGOUT_URL: &str = "/logout";
pub const REQUEST_CODE_URL: &str = "/request-code";
pub const STUDY_GUIDE_URL: &str = "/study-guide";

pub const START_QUIZ_URL: &str = "/start-quiz";
pub const SELECT_ANSWER_URL: &str = "/select-answer";
pub const SUBMIT_QUIZ_URL: &str = "/submit-quiz";
pub const RESTART_URL: &str = "/restart";
pub const RESULTS_URL: &str = "/results";

pub const ADMIN_URL: &str = "/admin";
pub const ADMIN_LOGIN_URL: &str = "/admin/login";
pub const ADMIN_LOGOUT_URL: &str = "/admin/logout";
pub const ADMIN_QUESTIONS_URL: &str = "/admin/questions";
pub const ADMIN_IMPORT_URL: &str = "/admin/import";
pub const ADMIN_EXPORT_URL: &str = "/admin/export.csv";
pub const ADMIN_CATALOG_URL: &str = "/admin/catalog";
pub const ADMIN_ACCESS_CODES_URL: &str = "/admin/access-codes";
pub const ADMIN_STUDY_GUIDE_URL: &str = "/admin/study-guide";

pub fn question_url(idx: usize) -> String {
    format!("/question/{idx}")
}

pub fn admin_question_url(id: i32) -> String {
    format!("/admin/questions/{id}")
}

pub fn admin_question_delete_url(id: i32) -> String {
    format!("/admin/questions/{id}/delete")
}

pub fn admin_access_code_toggle_url(id: i32) -> String {
    format!("/admin/access-codes/{id}/toggle")
}

pub fn admin_access_code_delete_url(id: i32) -> String {
    format!("/admin/access-codes/{id}/delete")
}

pub const STUDENT_SESSION_COOKIE_NAME: &str = "student_session";
pub const ADMIN_SESSION_COOKIE_NAME: &str = "admin_session";
pub const LOCALE_COOKIE_NAME: &str = "lang";
pub const DEFAULT_LOCALE: &str = "de";
pub const SET_LOCALE_URL: &str = "/set-locale";

// Quiz configuration bounds.
pub const MIN_QUESTION_COUNT: i64 = 5;
pub const MAX_QUESTION_COUNT: i64 = 60;
pub const DEFAULT_QUESTION_COUNT: i64 = 20;

/// A result at or above this percentage counts as passed.
pub const PASSING_PERCENTAGE: u32 = 80;

// Access codes expire this long after creation.
pub const ACCESS_CODE_MAX_AGE_MONTHS: i32 = 12;

// Self-service code delivery rate limits, per 15-minute window.
pub const CODE_REQUESTS_PER_EMAIL: i64 = 3;
pub const CODE_REQUESTS_PER_ADDRESS: i64 = 6;
pub const CODE_REQUEST_WINDOW_MINUTES: i64 = 15;

/// Fixed storage key the study guide is overwritten under.
pub const STUDY_GUIDE_KEY: &str = "studienleitfaden.pdf";
