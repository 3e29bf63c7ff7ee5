use maud::{html, Markup};
use rust_i18n::t;

use crate::engine::{CompletedQuiz, OptionOutcome, QuizRun};
use crate::models::Verband;
use crate::names;

/// Quiz configuration screen.
pub fn start_page(locale: &str) -> Markup {
    html! {
        h1 { (t!("quiz.welcome", locale = locale)) }
        p { (t!("quiz.intro", locale = locale)) }

        article style="width: fit-content;" {
            form hx-post=(names::START_QUIZ_URL)
                 hx-target="main"
                 hx-swap="innerHTML"
                 hx-disabled-elt="find input[type='submit']" {
                label {
                    (t!("quiz.question_count", locale = locale))
                    input name="question_count"
                          type="number"
                          min=(names::MIN_QUESTION_COUNT)
                          max=(names::MAX_QUESTION_COUNT)
                          value=(names::DEFAULT_QUESTION_COUNT)
                          required;
                    small style="display: block; margin-top: 0.5rem; color: #666;" {
                        (t!("quiz.question_count_hint",
                            min = names::MIN_QUESTION_COUNT,
                            max = names::MAX_QUESTION_COUNT,
                            locale = locale))
                    }
                }
                fieldset {
                    legend { (t!("quiz.module", locale = locale)) }
                    label {
                        input type="radio" name="verband" value="all" checked;
                        (t!("quiz.module_all", locale = locale))
                    }
                    @for verband in Verband::ALL {
                        label {
                            input type="radio" name="verband" value=(verband.as_str());
                            (verband.as_str())
                        }
                    }
                }
                input type="submit" value=(t!("quiz.start", locale = locale));
            }
        }

        p style="margin-top: 1rem;" {
            a href=(names::STUDY_GUIDE_URL) target="_blank" {
                (t!("quiz.study_guide", locale = locale))
            }
        }
        form hx-post=(names::LOGOUT_URL) hx-target="main" style="margin-top: 0.5rem;" {
            button type="submit" class="secondary" style="width: fit-content;" {
                (t!("quiz.logout", locale = locale))
            }
        }
    }
}

/// Error overlay on top of the config screen: one message, one way back.
pub fn load_error(message: &str, locale: &str) -> Markup {
    html! {
        article style="width: fit-content;" {
            header {
                h3 { (t!("quiz.error_title", locale = locale)) }
            }
            p { (message) }
            button hx-get="/" hx-target="main" hx-swap="innerHTML" {
                (t!("quiz.back_to_start", locale = locale))
            }
        }
    }
}

/// One quiz question with the jump list, option toggles and navigation.
pub fn question(run: &QuizRun, idx: usize, locale: &str) -> Markup {
    let question = &run.questions()[idx];
    let selection = run.selection(idx);
    let is_last = idx + 1 == run.len();
    let progress = ((idx + 1) * 100) / run.len().max(1);

    html! {
        article {
            p style="color: #666; font-size: 0.9rem; margin-bottom: 0.25rem;" {
                (t!("quiz.question_prefix", locale = locale))
                strong { (idx + 1) }
                (t!("quiz.question_of", locale = locale))
                (run.len())
            }
            progress value=(progress) max="100" {}

            div."jump-list" {
                @for i in 0..run.len() {
                    @let class = if i == idx {
                        "jump-btn jump-current"
                    } else if run.is_answered(i) {
                        "jump-btn jump-answered"
                    } else {
                        "jump-btn"
                    };
                    button type="button" class=(class)
                           hx-get=(names::question_url(i))
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (i + 1)
                    }
                }
            }

            @if let Some(image_url) = &question.image_url {
                img src=(image_url) alt="" class="question-image";
            }

            h3 style="white-space: pre-wrap;" {
                (question.question_text)
                " "
                span class=(format!("badge-type badge-{}", question.question_type.as_str().to_lowercase())) {
                    (question.question_type)
                }
            }
            @if question.question_type.is_multi() {
                p style="color: #0066cc; font-weight: 500;" {
                    (t!("quiz.multi_hint", locale = locale))
                }
            }

            div."option-list" {
                @for (i, option) in question.options.iter().enumerate() {
                    @let selected = selection.contains(&i);
                    button type="button"
                           class=(if selected { "option-btn option-selected" } else { "option-btn" })
                           hx-post=(names::SELECT_ANSWER_URL)
                           hx-vals=(format!(r#"{{"question_idx": {idx}, "option_idx": {i}}}"#))
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (option)
                    }
                }
            }

            div style="display: flex; gap: 1rem; margin-top: 1rem; align-items: center;" {
                @if idx > 0 {
                    button type="button" class="secondary"
                           hx-get=(names::question_url(idx - 1))
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (t!("quiz.previous", locale = locale))
                    }
                }
                span style="margin-left: auto;" {
                    @if is_last {
                        button type="button"
                               onclick="document.getElementById('submit-dialog').showModal()" {
                            (t!("quiz.submit", locale = locale))
                        }
                    } @else {
                        button type="button"
                               hx-get=(names::question_url(idx + 1))
                               hx-target="main"
                               hx-swap="innerHTML" {
                            (t!("quiz.next", locale = locale))
                        }
                    }
                }
            }
        }

        // Submitting is only reachable through this confirmation.
        dialog id="submit-dialog" {
            article {
                p { (t!("quiz.submit_confirm", locale = locale)) }
                p style="font-size: 0.9rem; color: #666;" {
                    (t!("quiz.submit_answered", answered = run.answered_count(), total = run.len(), locale = locale))
                }
                footer style="display: flex; gap: 0.5rem; justify-content: flex-end;" {
                    button onclick="document.getElementById('submit-dialog').close()"
                           class="secondary" {
                        (t!("quiz.submit_cancel", locale = locale))
                    }
                    button hx-post=(names::SUBMIT_QUIZ_URL)
                           hx-target="main"
                           hx-swap="innerHTML" {
                        (t!("quiz.submit", locale = locale))
                    }
                }
            }
        }
    }
}

/// Scored review after submission.
pub fn results(completed: &CompletedQuiz, locale: &str) -> Markup {
    let report = &completed.report;
    let passed = report.percentage >= names::PASSING_PERCENTAGE;

    html! {
        article style="text-align: center;" {
            @if passed {
                h2 { "✓ " (t!("result.passed", locale = locale)) }
            } @else {
                h2 { "✗ " (t!("result.failed", locale = locale)) }
            }
            p style="font-size: 3rem; font-weight: 700; margin: 0.5rem 0;" {
                (report.percentage) "%"
            }
            p {
                (report.correct_count) " / " (completed.questions.len())
                " " (t!("result.correct_suffix", locale = locale))
            }
        }

        h3 { (t!("result.details", locale = locale)) }
        @for (idx, question) in completed.questions.iter().enumerate() {
            @let outcome = &report.per_question[idx];
            article {
                div style="display: flex; align-items: flex-start; gap: 0.75rem;" {
                    span class=(if outcome.correct { "result-num result-num-correct" } else { "result-num result-num-incorrect" }) {
                        (idx + 1)
                    }
                    p style="font-weight: 600; white-space: pre-wrap; margin-bottom: 0;" {
                        (question.question_text)
                    }
                }
                @if let Some(image_url) = &question.image_url {
                    img src=(image_url) alt="" class="question-image";
                }
                div."option-list" {
                    @for (i, option) in question.options.iter().enumerate() {
                        @let class = match outcome.options[i] {
                            OptionOutcome::CorrectSelected => "option-review option-correct",
                            OptionOutcome::IncorrectSelected => "option-review option-incorrect",
                            OptionOutcome::MissedCorrect => "option-review option-missed",
                            OptionOutcome::Neutral => "option-review option-neutral",
                        };
                        @let badge = match outcome.options[i] {
                            OptionOutcome::CorrectSelected => Some(t!("result.correct_selected", locale = locale)),
                            OptionOutcome::IncorrectSelected => Some(t!("result.incorrect_selected", locale = locale)),
                            OptionOutcome::MissedCorrect => Some(t!("result.missed_correct", locale = locale)),
                            OptionOutcome::Neutral => None,
                        };
                        div class=(class) {
                            span style="white-space: pre-wrap;" { (option) }
                            @if let Some(badge) = badge {
                                span."review-badge" { (badge) }
                            }
                        }
                    }
                }
            }
        }

        div style="display: flex; gap: 1rem; margin-top: 1rem;" {
            button hx-post=(names::RESTART_URL) hx-target="main" hx-swap="innerHTML" {
                (t!("result.restart", locale = locale))
            }
            form hx-post=(names::LOGOUT_URL) hx-target="main" style="margin: 0;" {
                button type="submit" class="secondary" {
                    (t!("result.logout", locale = locale))
                }
            }
        }
    }
}
