use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use ulid::Ulid;

use crate::engine::SessionState;

/// In-memory session registry: student logins (each carrying its quiz
/// state machine) and admin logins, keyed by opaque tokens handed out as
/// cookies. Everything here is transient; a process restart logs everyone
/// out and discards any quiz in progress.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    students: HashMap<String, SessionState>,
    admins: HashSet<String>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Sessions hold no invariants that a panicked writer could break
        // mid-update, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a freshly authenticated student and return their token.
    pub fn login_student(&self) -> String {
        let token = Ulid::new().to_string();
        self.lock()
            .students
            .insert(token.clone(), SessionState::default());
        tracing::info!("student session created");
        token
    }

    pub fn is_student(&self, token: &str) -> bool {
        self.lock().students.contains_key(token)
    }

    /// Run `f` against the student's quiz state. `None` when the token is
    /// unknown (logged out or process restarted).
    pub fn with_student<R>(&self, token: &str, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        let mut inner = self.lock();
        inner.students.get_mut(token).map(f)
    }

    pub fn logout_student(&self, token: &str) {
        if self.lock().students.remove(token).is_some() {
            tracing::info!("student session ended");
        }
    }

    pub fn login_admin(&self) -> String {
        let token = Ulid::new().to_string();
        self.lock().admins.insert(token.clone());
        tracing::info!("admin session created");
        token
    }

    pub fn is_admin(&self, token: &str) -> bool {
        self.lock().admins.contains(token)
    }

    pub fn logout_admin(&self, token: &str) {
        self.lock().admins.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_lifecycle() {
        let sessions = Sessions::new();
        let token = sessions.login_student();
        assert!(sessions.is_student(&token));
        assert!(!sessions.is_student("unknown"));

        let state_is_config = sessions
            .with_student(&token, |state| {
                matches!(state, SessionState::Config)
            })
            .expect("known token");
        assert!(state_is_config);

        sessions.logout_student(&token);
        assert!(!sessions.is_student(&token));
        assert!(sessions.with_student(&token, |_| ()).is_none());
    }

    #[test]
    fn admin_tokens_are_separate_from_students() {
        let sessions = Sessions::new();
        let admin = sessions.login_admin();
        assert!(sessions.is_admin(&admin));
        assert!(!sessions.is_student(&admin));
        sessions.logout_admin(&admin);
        assert!(!sessions.is_admin(&admin));
    }
}
