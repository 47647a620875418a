//! Router-level tests driven through `tower::ServiceExt::oneshot`, so no
//! TCP listener or live database is needed. The pool is lazy: routes that
//! never reach the database run normally, routes that do surface the
//! generic server error.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use pressroom::routes::make_app;
use pressroom::utils::config::Config;
use pressroom::utils::jwt_encode::jwt_encode;
use pressroom::utils::state::AppState;

const TEST_SECRET: &str = "test-secret";

fn test_state() -> Arc<AppState> {
    let db_url = "postgres://postgres@localhost/pressroom_test";
    let pool = PgPoolOptions::new().connect_lazy(db_url).unwrap();
    let config = Config {
        db_url: db_url.into(),
        jwt_secret: TEST_SECRET.into(),
        port: 0,
        public_dir: "public".into(),
        image_max_bytes: 5 * 1024 * 1024,
        news_cache_ttl_secs: 60,
    };
    Arc::new(AppState::with_pool(pool, config))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let app = make_app(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "App is working");
}

#[tokio::test]
async fn create_news_without_token_is_unauthorized() {
    let app = make_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Missing Bearer token");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = make_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/news/1")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_requires_authentication() {
    let app = make_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_for_another_user_is_unauthorized() {
    let app = make_app(test_state());
    let token = jwt_encode(7, "ada@example.com".into(), TEST_SECRET).unwrap();

    // Ownership is checked before the body is touched, so no database or
    // multipart payload is needed to observe the rejection.
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile/3")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Unauthorized");
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let app = make_app(test_state());
    let token = jwt_encode(7, "ada@example.com".into(), TEST_SECRET).unwrap();

    // Authentication passes; the lazy pool then fails the lookup, which
    // must surface as the generic server error rather than a 401.
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/news/1")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Something went wrong. Please try again.");
}
