use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::auth::{login, register};
use crate::utils::state::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}
