mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use pruefungstrainer::router;
use tower::ServiceExt;

fn app() -> axum::Router {
    router(common::test_state())
}

#[tokio::test]
async fn protected_routes_reject_access_without_session_cookie() {
    let app = app();

    let cases = [
        "/question/0",
        "/results",
        "/study-guide",
        "/admin/questions",
        "/admin/questions/new",
        "/admin/access-codes",
        "/admin/export.csv",
        "/admin/catalog",
    ];

    for uri in cases {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }
}

#[tokio::test]
async fn state_changing_requests_without_htmx_header_fail_the_csrf_check() {
    let app = app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/logout")
        .body(Body::empty())
        .expect("request build should succeed");

    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn htmx_posts_without_a_session_are_unauthorized() {
    let app = app();

    let cases = [
        ("/start-quiz", "question_count=10&verband=all"),
        ("/select-answer", "question_idx=0&option_idx=1"),
        ("/submit-quiz", ""),
        ("/restart", ""),
        ("/admin/questions/1/delete", ""),
        ("/admin/study-guide", ""),
    ];

    for (uri, body) in cases {
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("HX-Request", "true")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }
}

#[tokio::test]
async fn login_and_admin_pages_are_public() {
    let app = app();

    for uri in ["/", "/admin"] {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(resp.status(), StatusCode::OK, "expected OK for {uri}");
    }
}

#[tokio::test]
async fn embedded_static_assets_are_served() {
    let app = app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/static/index.css")
        .body(Body::empty())
        .expect("request build should succeed");

    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").map(|v| v.as_bytes()),
        Some(b"text/css".as_ref()),
    );
}
