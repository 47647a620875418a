use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::handlers::news::{destroy, index, show, store, update};
use crate::utils::state::AppState;

pub fn news_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(index).post(store))
        .route("/news/{id}", get(show).put(update).delete(destroy))
}
