use maud::{html, Markup, DOCTYPE};
use rust_i18n::t;

use crate::catalog::QuestionFilter;
use crate::models::{AccessCode, Question, QuestionType, Verband};
use crate::names;

pub enum AdminTab {
    Questions,
    AccessCodes,
}

pub enum Flash {
    Success(String),
    Error(String),
}

fn flash(message: &Option<Flash>) -> Markup {
    html! {
        @match message {
            Some(Flash::Success(text)) => { p."flash-success" { (text) } }
            Some(Flash::Error(text)) => { p."flash-error" { (text) } }
            None => {}
        }
    }
}

/// Shared admin chrome: headline, logout, tab navigation.
pub fn panel(tab: AdminTab, content: Markup, locale: &str) -> Markup {
    html! {
        div style="display: flex; align-items: center;" {
            h1 style="margin-bottom: 0;" { (t!("admin.title", locale = locale)) }
            span style="margin-left: auto;" {
                form hx-post=(names::ADMIN_LOGOUT_URL) hx-target="main" style="margin: 0;" {
                    button type="submit" class="secondary" { (t!("admin.logout", locale = locale)) }
                }
            }
        }

        nav."admin-tabs" {
            ul {
                li {
                    a href="#"
                      class=(if matches!(tab, AdminTab::Questions) { "tab-active" } else { "" })
                      hx-get=(names::ADMIN_QUESTIONS_URL)
                      hx-target="main"
                      hx-swap="innerHTML" {
                        (t!("admin.tab_questions", locale = locale))
                    }
                }
                li {
                    a href="#"
                      class=(if matches!(tab, AdminTab::AccessCodes) { "tab-active" } else { "" })
                      hx-get=(names::ADMIN_ACCESS_CODES_URL)
                      hx-target="main"
                      hx-swap="innerHTML" {
                        (t!("admin.tab_codes", locale = locale))
                    }
                }
            }
        }

        (content)
    }
}

pub struct QuestionTableData {
    pub questions: Vec<Question>,
    pub categories: Vec<String>,
    pub filter: QuestionFilter,
    pub flash: Option<Flash>,
}

fn sort_link(filter: &QuestionFilter, key: &str) -> String {
    let dir = if filter.sort.as_deref() == Some(key) && !filter.descending() {
        "desc"
    } else {
        "asc"
    };
    let mut query = format!("{}?sort={key}&dir={dir}", names::ADMIN_QUESTIONS_URL);
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query.push_str(&format!("&search={}", urlencoding::encode(search)));
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        query.push_str(&format!("&category={}", urlencoding::encode(category)));
    }
    if let Some(verband) = filter.verband.as_deref().filter(|s| !s.is_empty()) {
        query.push_str(&format!("&verband={}", urlencoding::encode(verband)));
    }
    if let Some(qtype) = filter.qtype.as_deref().filter(|s| !s.is_empty()) {
        query.push_str(&format!("&qtype={}", urlencoding::encode(qtype)));
    }
    query
}

fn sort_header(filter: &QuestionFilter, key: &str, label: &str) -> Markup {
    let indicator = if filter.sort.as_deref() == Some(key) {
        if filter.descending() {
            " ▼"
        } else {
            " ▲"
        }
    } else {
        ""
    };
    html! {
        th {
            a href="#" hx-get=(sort_link(filter, key)) hx-target="main" hx-swap="innerHTML" {
                (label) (indicator)
            }
        }
    }
}

pub fn questions_tab(data: QuestionTableData, locale: &str) -> Markup {
    html! {
        (flash(&data.flash))

        div."admin-cards" {
            article {
                h4 { (t!("admin.guide_title", locale = locale)) }
                p { (t!("admin.guide_hint", locale = locale)) }
                form hx-post=(names::ADMIN_STUDY_GUIDE_URL)
                     hx-encoding="multipart/form-data"
                     hx-target="main"
                     hx-disabled-elt="find input[type='submit']" {
                    input type="file" name="file" accept=".pdf" required;
                    input type="submit" value=(t!("admin.guide_upload", locale = locale));
                }
            }
            article {
                h4 { (t!("admin.import_title", locale = locale)) }
                p { (t!("admin.import_hint", locale = locale)) }
                form hx-post=(names::ADMIN_IMPORT_URL)
                     hx-encoding="multipart/form-data"
                     hx-target="main"
                     hx-disabled-elt="find input[type='submit']" {
                    input type="file" name="file" accept=".csv" required;
                    fieldset {
                        @for verband in Verband::ALL {
                            label {
                                input type="radio" name="verband" value=(verband.as_str()) required;
                                (verband.as_str())
                            }
                        }
                    }
                    input type="submit" value=(t!("admin.import_submit", locale = locale));
                }
            }
            article {
                h4 { (t!("admin.export_title", locale = locale)) }
                p { (t!("admin.export_hint", locale = locale)) }
                div style="display: flex; gap: 0.5rem;" {
                    a href=(names::ADMIN_EXPORT_URL) role="button" class="secondary" {
                        "CSV Export"
                    }
                    a href=(names::ADMIN_CATALOG_URL) target="_blank" role="button" class="secondary" {
                        (t!("admin.catalog_link", locale = locale))
                    }
                }
            }
        }

        article {
            div style="display: flex; align-items: center;" {
                h3 style="margin-bottom: 0;" {
                    (t!("admin.question_list", count = data.questions.len(), locale = locale))
                }
                span style="margin-left: auto;" {
                    button hx-get=(format!("{}/new", names::ADMIN_QUESTIONS_URL))
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (t!("admin.new_question", locale = locale))
                    }
                }
            }

            form hx-get=(names::ADMIN_QUESTIONS_URL)
                 hx-target="main"
                 hx-swap="innerHTML"
                 class="filter-row" {
                input type="search" name="search"
                      placeholder=(t!("admin.search", locale = locale))
                      value=(data.filter.search.as_deref().unwrap_or(""));
                select name="category" {
                    option value="all" { (t!("admin.all_categories", locale = locale)) }
                    @for category in &data.categories {
                        option value=(category)
                               selected[data.filter.category.as_deref() == Some(category.as_str())] {
                            (category)
                        }
                    }
                }
                select name="verband" {
                    option value="all" { (t!("admin.all_verbaende", locale = locale)) }
                    @for verband in Verband::ALL {
                        option value=(verband.as_str())
                               selected[data.filter.verband.as_deref() == Some(verband.as_str())] {
                            (verband.as_str())
                        }
                    }
                }
                select name="qtype" {
                    option value="all" { (t!("admin.all_types", locale = locale)) }
                    @for qtype in [QuestionType::Single, QuestionType::Multi] {
                        option value=(qtype.as_str())
                               selected[data.filter.qtype.as_deref() == Some(qtype.as_str())] {
                            (qtype.as_str())
                        }
                    }
                }
                input type="submit" class="secondary" value=(t!("admin.apply_filter", locale = locale));
            }

            form hx-post=(format!("{}/delete-bulk", names::ADMIN_QUESTIONS_URL))
                 hx-target="main"
                 hx-confirm=(t!("admin.bulk_delete_confirm", locale = locale)) {
                div style="overflow-x: auto;" {
                    table {
                        thead {
                            tr {
                                th { }
                                th { "Nr." }
                                (sort_header(&data.filter, "question", &t!("admin.col_question", locale = locale)))
                                (sort_header(&data.filter, "type", &t!("admin.col_type", locale = locale)))
                                (sort_header(&data.filter, "category", &t!("admin.col_category", locale = locale)))
                                (sort_header(&data.filter, "verband", "Verband"))
                                th { (t!("admin.col_actions", locale = locale)) }
                            }
                        }
                        tbody {
                            @for (nr, question) in data.questions.iter().enumerate() {
                                tr {
                                    td {
                                        @if let Some(id) = question.id {
                                            input type="checkbox" name="ids" value=(id);
                                        }
                                    }
                                    td { (nr + 1) }
                                    td."cell-question" {
                                        (question.question_text)
                                        @if question.image_url.is_some() { " 🖼" }
                                    }
                                    td {
                                        span class=(format!("badge-type badge-{}", question.question_type.as_str().to_lowercase())) {
                                            (question.question_type)
                                        }
                                    }
                                    td { (question.category.as_deref().unwrap_or("–")) }
                                    td { (question.verband.map(|v| v.as_str()).unwrap_or("–")) }
                                    td {
                                        @if let Some(id) = question.id {
                                            button type="button" class="link-btn"
                                                   hx-get=(format!("{}/edit", names::admin_question_url(id)))
                                                   hx-target="main"
                                                   hx-swap="innerHTML" {
                                                (t!("admin.edit", locale = locale))
                                            }
                                            button type="button" class="link-btn link-danger"
                                                   hx-post=(names::admin_question_delete_url(id))
                                                   hx-target="main"
                                                   hx-confirm=(t!("admin.delete_confirm", locale = locale)) {
                                                (t!("admin.delete", locale = locale))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                input type="submit" class="secondary" value=(t!("admin.bulk_delete", locale = locale));
            }
        }
    }
}

pub fn question_form(question: Option<&Question>, error: Option<&str>, locale: &str) -> Markup {
    let action = match question.and_then(|q| q.id) {
        Some(id) => names::admin_question_url(id),
        None => names::ADMIN_QUESTIONS_URL.to_string(),
    };
    let title = if question.is_some() {
        t!("admin.edit_question", locale = locale)
    } else {
        t!("admin.create_question", locale = locale)
    };
    let is_multi = question.is_some_and(|q| q.question_type.is_multi());

    html! {
        article {
            h3 { (title) }
            @if let Some(error) = error {
                p."flash-error" { (error) }
            }
            form hx-post=(action)
                 hx-target="main"
                 hx-swap="innerHTML"
                 hx-disabled-elt="find input[type='submit']" {
                label {
                    (t!("admin.field_question", locale = locale))
                    textarea name="question_text" rows="4" required {
                        (question.map(|q| q.question_text.as_str()).unwrap_or(""))
                    }
                }
                label {
                    (t!("admin.field_image", locale = locale))
                    input type="text" name="image_url" placeholder="https://example.com/bild.png"
                          value=(question.and_then(|q| q.image_url.as_deref()).unwrap_or(""));
                }
                div."form-grid" {
                    label {
                        (t!("admin.col_category", locale = locale))
                        input type="text" name="category"
                              value=(question.and_then(|q| q.category.as_deref()).unwrap_or(""));
                    }
                    label {
                        (t!("admin.col_type", locale = locale))
                        select name="question_type" {
                            option value="Single" selected[!is_multi] { "Single" }
                            option value="Multi" selected[is_multi] { "Multi" }
                        }
                    }
                    label {
                        "Verband"
                        select name="verband" {
                            @for verband in Verband::ALL {
                                option value=(verband.as_str())
                                       selected[question.and_then(|q| q.verband) == Some(verband)] {
                                    (verband.as_str())
                                }
                            }
                        }
                    }
                }

                label { (t!("admin.field_options", locale = locale)) }
                @for i in 0..crate::catalog::MAX_IMPORT_OPTIONS {
                    @let option = question.and_then(|q| q.options.get(i));
                    @let checked = question.is_some_and(|q| q.correct_answer_indices.contains(&i));
                    div style="display: flex; gap: 0.75rem; align-items: center; margin-bottom: 0.5rem;" {
                        input type="checkbox" name=(format!("correct_{}", i + 1)) checked[checked];
                        input type="text" name=(format!("option_{}", i + 1))
                              style="margin-bottom: 0;"
                              value=(option.map(String::as_str).unwrap_or(""));
                    }
                }
                small { (t!("admin.options_hint", locale = locale)) }

                div style="display: flex; gap: 1rem; margin-top: 1rem;" {
                    button type="button" class="secondary"
                           hx-get=(names::ADMIN_QUESTIONS_URL)
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (t!("admin.cancel", locale = locale))
                    }
                    input type="submit" value=(t!("admin.save", locale = locale));
                }
            }
        }
    }
}

pub struct AccessCodeTableData {
    pub codes: Vec<AccessCode>,
    pub flash: Option<Flash>,
}

pub fn access_codes_tab(data: AccessCodeTableData, locale: &str) -> Markup {
    html! {
        (flash(&data.flash))

        article {
            h4 { (t!("admin.code_create_title", locale = locale)) }
            form hx-post=(names::ADMIN_ACCESS_CODES_URL)
                 hx-target="main"
                 hx-disabled-elt="find input[type='submit']"
                 class="filter-row" {
                input type="text" name="student_name"
                      placeholder=(t!("admin.code_name", locale = locale)) required;
                input type="email" name="email"
                      placeholder=(t!("admin.code_email", locale = locale)) required;
                input type="submit" value=(t!("admin.code_create", locale = locale));
            }
        }

        article {
            h3 { (t!("admin.code_list", count = data.codes.len(), locale = locale)) }
            div style="overflow-x: auto;" {
                table {
                    thead {
                        tr {
                            th { "Code" }
                            th { (t!("admin.code_name", locale = locale)) }
                            th { (t!("admin.code_email", locale = locale)) }
                            th { (t!("admin.code_created", locale = locale)) }
                            th { (t!("admin.code_active", locale = locale)) }
                            th { (t!("admin.col_actions", locale = locale)) }
                        }
                    }
                    tbody {
                        @for code in &data.codes {
                            tr {
                                td { code { (code.code) } }
                                td { (code.student_name.as_deref().unwrap_or("–")) }
                                td { (code.email) }
                                td { (code.created_at) }
                                td {
                                    input type="checkbox" role="switch" checked[code.is_active]
                                          hx-post=(names::admin_access_code_toggle_url(code.id))
                                          hx-target="main"
                                          hx-swap="innerHTML";
                                }
                                td {
                                    button type="button" class="link-btn link-danger"
                                           hx-post=(names::admin_access_code_delete_url(code.id))
                                           hx-target="main"
                                           hx-confirm=(t!("admin.code_delete_confirm", locale = locale)) {
                                        (t!("admin.delete", locale = locale))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Standalone printable catalog: Nr. / Frage / Kategorie / Verband /
/// correct answers, paginated by the print stylesheet.
pub fn catalog_page(questions: &[Question], locale: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="utf-8";
                link rel="stylesheet" href="/static/index.css";
                title { (t!("admin.catalog_title", locale = locale)) }
            }
            body."catalog-print" {
                h1 { (t!("admin.catalog_title", locale = locale)) }
                button onclick="window.print()" class="no-print" {
                    (t!("admin.print", locale = locale))
                }
                table {
                    thead {
                        tr {
                            th { "Nr." }
                            th { "Frage" }
                            th { "Kategorie" }
                            th { "Verband" }
                            th { "Korrekte Antwort(en)" }
                        }
                    }
                    tbody {
                        @for (nr, question) in questions.iter().enumerate() {
                            tr {
                                td { (nr + 1) }
                                td { (question.question_text) }
                                td { (question.category.as_deref().unwrap_or("–")) }
                                td { (question.verband.map(|v| v.as_str()).unwrap_or("–")) }
                                td {
                                    (question
                                        .correct_answer_indices
                                        .iter()
                                        .filter_map(|&i| question.options.get(i))
                                        .map(String::as_str)
                                        .collect::<Vec<_>>()
                                        .join("; "))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
