pub mod auth;
pub mod news;
pub mod profile;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::handlers::middleware::rate_limit_middleware;
use crate::utils::state::AppState;

pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let filter = filter::Targets::new()
        .with_target("tower_http::trace::on_response", Level::TRACE)
        .with_target("tower_http::trace::on_request", Level::TRACE)
        .with_target("tower_http::trace::make_span", Level::DEBUG)
        .with_target("axum::rejection", Level::TRACE)
        .with_target(env!("CARGO_PKG_NAME"), level)
        .with_default(Level::INFO);

    let tracing_layer = tracing_subscriber::fmt::layer();

    Registry::default().with(tracing_layer).with(filter).init();
}

/// Assemble the router around shared state. Pure function of its input
/// so tests can build an app against their own state.
pub fn make_app(state: Arc<AppState>) -> Router {
    let images_dir = std::path::Path::new(&state.config.public_dir).join("images");

    // Multipart bodies carry the image, so the limit tracks the image cap.
    let body_limit = state.config.image_max_bytes + 1024 * 1024;

    let api = Router::new()
        .nest("/auth", auth::auth_routes())
        .merge(news::news_routes())
        .merge(profile::profile_routes());

    Router::new()
        .route("/", get(health_check))
        .nest("/api", api)
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "App is working" }))).into_response()
}
