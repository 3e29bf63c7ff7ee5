use maud::{html, Markup};
use rust_i18n::t;

use crate::names;

pub enum LoginState {
    NoError,
    InvalidCode,
}

pub fn login(state: LoginState, locale: &str) -> Markup {
    html! {
        h1 { (t!("login.title", locale = locale)) }
        p { (t!("login.intro", locale = locale)) }

        article style="width: fit-content;" {
            form hx-post=(names::LOGIN_URL)
                 hx-target="main"
                 hx-swap="innerHTML"
                 hx-disabled-elt="find input[type='submit']" {
                label {
                    (t!("login.code_label", locale = locale))
                    input name="code"
                          type="text"
                          autocomplete="off"
                          placeholder="BRAV-PFOTE-123"
                          aria-label=(t!("login.code_label", locale = locale))
                          required;
                }
                @if matches!(state, LoginState::InvalidCode) {
                    p."error-inline" { (t!("login.invalid_code", locale = locale)) }
                }
                input type="submit" value=(t!("login.submit", locale = locale));
            }
        }

        details {
            summary { (t!("login.forgot_code", locale = locale)) }
            form hx-post=(names::REQUEST_CODE_URL)
                 hx-target="main"
                 hx-swap="innerHTML"
                 hx-disabled-elt="find input[type='submit']" {
                label {
                    (t!("login.email_label", locale = locale))
                    input name="email" type="email" required;
                }
                input type="submit" class="secondary" value=(t!("login.request_code", locale = locale));
            }
        }

        footer style="margin-top: 2rem;" {
            a href=(names::ADMIN_URL) class="secondary" style="font-size: 0.8rem;" {
                "Admin"
            }
        }
    }
}

/// Shown after a code request, no matter what actually happened.
pub fn request_code_sent(locale: &str) -> Markup {
    html! {
        article style="width: fit-content;" {
            h3 { (t!("login.request_sent_title", locale = locale)) }
            p { (t!("login.request_sent_body", locale = locale)) }
            button hx-get="/" hx-target="main" hx-swap="innerHTML" {
                (t!("login.back_to_login", locale = locale))
            }
        }
    }
}

pub enum AdminLoginState {
    NoError,
    InvalidCredentials,
}

pub fn admin_login(state: AdminLoginState, locale: &str) -> Markup {
    html! {
        h1 { (t!("admin.login_title", locale = locale)) }

        article style="width: fit-content;" {
            form hx-post=(names::ADMIN_LOGIN_URL)
                 hx-target="main"
                 hx-swap="innerHTML"
                 hx-disabled-elt="find input[type='submit']" {
                label {
                    (t!("admin.username", locale = locale))
                    input name="username" type="text" autocomplete="username" required;
                }
                label {
                    (t!("admin.password", locale = locale))
                    input name="password" type="password" autocomplete="current-password" required;
                }
                @if matches!(state, AdminLoginState::InvalidCredentials) {
                    p."error-inline" { (t!("admin.invalid_credentials", locale = locale)) }
                }
                input type="submit" value=(t!("admin.login_submit", locale = locale));
            }
            p {
                a href="/" class="secondary" { (t!("admin.back_to_app", locale = locale)) }
            }
        }
    }
}
