use pruefungstrainer::db::Db;
use pruefungstrainer::email::ResendMailer;
use pruefungstrainer::AppState;

/// State over a lazily-connecting pool: routes that never reach the
/// database can be exercised without a server running.
pub fn test_state() -> AppState {
    let db = Db::new_lazy("postgres://localhost:5432/pruefungstrainer_test")
        .expect("lazy pool should build");
    let mailer = ResendMailer::new(String::new(), "http://localhost".to_string());
    AppState::new(db, mailer, false)
}
