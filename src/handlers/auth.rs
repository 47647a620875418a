use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::models::error::Error;
use crate::models::user::{LoginPayload, RegisterPayload, User};
use crate::utils::hash_password::{hash_password, verify_password};
use crate::utils::jwt_encode::jwt_encode;
use crate::utils::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response, Error> {
    let new_user = payload.validate()?;

    let hashed = hash_password(&new_user.password)?;

    let created: Result<User, sqlx::Error> = sqlx::query_as(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) \
         RETURNING id, name, email, password, profile, created_at",
    )
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&hashed)
    .fetch_one(&state.db_pool)
    .await;

    match created {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Account created successfully", "user": user })),
        )
            .into_response()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::field(
            "email",
            "Email is already taken. Please use another one.",
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Response, Error> {
    let (email, password) = payload.validate()?;

    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password, profile, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db_pool)
    .await?;

    let user = user.ok_or_else(|| Error::field("email", "No user found with this email"))?;

    if !verify_password(&password, &user.password) {
        return Err(Error::field("password", "Invalid credentials"));
    }

    let access_token = jwt_encode(user.id, user.email.clone(), &state.config.jwt_secret)?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": 200, "access_token": access_token, "user": user })),
    )
        .into_response())
}
