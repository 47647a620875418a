use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::profile::{index, update};
use crate::utils::state::AppState;

pub fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(index))
        .route("/profile/{id}", put(update))
}
