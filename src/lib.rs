pub mod handlers;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod utils;
