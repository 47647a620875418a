use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::models::error::Error;
use crate::models::jwt::Claims;
use crate::models::user::User;
use crate::utils::state::AppState;
use crate::utils::uploads::{collect_form, image_validator, random_image_name, remove_image, save_image};

pub async fn index(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Response, Error> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password, profile, created_at FROM users WHERE id = $1",
    )
    .bind(claims.sub)
    .fetch_optional(&state.db_pool)
    .await?;

    let user = user.ok_or_else(|| Error::new(StatusCode::NOT_FOUND, "User not found"))?;

    Ok((StatusCode::OK, Json(json!({ "status": 200, "user": user }))).into_response())
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    claims: Claims,
    mut multipart: Multipart,
) -> Result<Response, Error> {
    // Only the session's own profile is writable.
    if id != claims.sub {
        return Err(Error::new(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    let (_fields, file) = collect_form(&mut multipart, "profile").await?;
    let profile = file.ok_or_else(|| Error::field("profile", "Profile image is required"))?;
    if let Some(message) = image_validator(
        profile.bytes.len(),
        profile.content_type.as_deref(),
        state.config.image_max_bytes,
    ) {
        return Err(Error::field("profile", &message));
    }

    let old_profile: Option<Option<String>> =
        sqlx::query_scalar("SELECT profile FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db_pool)
            .await?;
    let old_profile = old_profile.ok_or_else(|| Error::new(StatusCode::NOT_FOUND, "User not found"))?;

    let image_name = random_image_name(&profile.file_name);
    save_image(&state.config.public_dir, &image_name, &profile.bytes).await?;

    let persisted = sqlx::query("UPDATE users SET profile = $1 WHERE id = $2")
        .bind(&image_name)
        .bind(id)
        .execute(&state.db_pool)
        .await;

    if let Err(e) = persisted {
        let _ = remove_image(&state.config.public_dir, &image_name).await;
        return Err(e.into());
    }

    if let Some(old) = old_profile.as_deref() {
        if let Err(err) = remove_image(&state.config.public_dir, old).await {
            tracing::warn!("failed to remove replaced profile image {old}: {err}");
        }
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "status": 200, "message": "Profile updated successfully" })),
    )
        .into_response())
}
