use std::sync::Arc;
use std::time::Duration;

use axum::serve;
use pressroom::jobs::spawn_cache_sweeper;
use pressroom::routes::{init_tracing, make_app};
use pressroom::utils::config::Config;
use pressroom::utils::state::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Initializing application...");
    let config = Config::init();
    let port = config.port;

    let state = match AppState::init(config).await {
        Ok(state) => Arc::new(state),
        Err(err) => panic!("Failed to connect to database: {err}"),
    };
    info!("Database connection pool created successfully");

    if let Err(err) = sqlx::migrate!().run(&state.db_pool).await {
        panic!("Failed to run migrations: {err}");
    }

    spawn_cache_sweeper(state.clone(), Duration::from_secs(60));

    let app = make_app(state);
    info!("Application initialized successfully");

    let listener = TcpListener::bind(("0.0.0.0", port)).await;
    info!("Listening on http://0.0.0.0:{port}");

    match listener {
        Ok(res) => serve(res, app).await.unwrap(),
        Err(err) => panic!("{}", err),
    }
}
