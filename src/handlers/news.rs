use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::{json, Value};

use crate::models::cache::CacheEntry;
use crate::models::error::Error;
use crate::models::jwt::Claims;
use crate::models::news::{transform, News, NewsPayload, NewsWithAuthor, Pagination};
use crate::utils::state::AppState;
use crate::utils::uploads::{
    collect_form, image_validator, random_image_name, remove_image, save_image,
};

const NEWS_WITH_AUTHOR: &str = "SELECT n.id, n.title, n.body, n.image, n.user_id, \
     n.created_at, n.updated_at, u.id AS author_id, u.name AS author_name, \
     u.profile AS author_profile FROM news n LEFT JOIN users u ON u.id = n.user_id";

const NEWS_COLUMNS: &str = "id, title, body, image, user_id, created_at, updated_at";

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, Error> {
    let page = params.get("page").and_then(|p| p.parse().ok());
    let limit = params.get("limit").and_then(|l| l.parse().ok());
    let pagination = Pagination::clamp(page, limit);

    let cache_key = format!("page={}&limit={}", pagination.page, pagination.limit);
    if let Some(entry) = state.news_cache.get(&cache_key) {
        if !entry.is_expired() {
            return Ok((StatusCode::OK, Json(entry.value.clone())).into_response());
        }
    }

    let sql = format!("{NEWS_WITH_AUTHOR} ORDER BY n.id LIMIT $1 OFFSET $2");
    let rows: Vec<NewsWithAuthor> = sqlx::query_as(&sql)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.db_pool)
        .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM news")
        .fetch_one(&state.db_pool)
        .await?;

    let news: Vec<Value> = rows.iter().map(transform).collect();
    let body = json!({
        "status": 200,
        "news": news,
        "metadata": {
            "totalPages": pagination.total_pages(total),
            "currentPage": pagination.page,
            "currentLimit": pagination.limit,
        }
    });

    state.news_cache.insert(
        cache_key,
        CacheEntry::new(body.clone(), state.config.news_cache_ttl_secs),
    );

    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, Error> {
    let sql = format!("{NEWS_WITH_AUTHOR} WHERE n.id = $1");
    let row: Option<NewsWithAuthor> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?;

    // An absent record is a null payload, not an error.
    let news = row.as_ref().map(transform);
    Ok((StatusCode::OK, Json(json!({ "status": 200, "news": news }))).into_response())
}

pub async fn store(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    mut multipart: Multipart,
) -> Result<Response, Error> {
    let (fields, file) = collect_form(&mut multipart, "image").await?;
    let payload = NewsPayload::from_fields(&fields)?;

    let image = file.ok_or_else(|| Error::field("image", "Image is required"))?;
    if let Some(message) = image_validator(
        image.bytes.len(),
        image.content_type.as_deref(),
        state.config.image_max_bytes,
    ) {
        return Err(Error::field("image", &message));
    }

    // The file must be in place before the row referencing it exists.
    let image_name = random_image_name(&image.file_name);
    save_image(&state.config.public_dir, &image_name, &image.bytes).await?;

    let sql = format!(
        "INSERT INTO news (title, body, image, user_id) VALUES ($1, $2, $3, $4) \
         RETURNING {NEWS_COLUMNS}"
    );
    let created: Result<News, sqlx::Error> = sqlx::query_as(&sql)
        .bind(&payload.title)
        .bind(&payload.body)
        .bind(&image_name)
        .bind(claims.sub)
        .fetch_one(&state.db_pool)
        .await;

    let news = match created {
        Ok(news) => news,
        Err(e) => {
            // Do not leave an unreferenced upload behind.
            let _ = remove_image(&state.config.public_dir, &image_name).await;
            return Err(e.into());
        }
    };

    state.news_cache.clear();

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "News created successfully", "news": news })),
    )
        .into_response())
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    claims: Claims,
    mut multipart: Multipart,
) -> Result<Response, Error> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
    let news: Option<News> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?;
    let news = news.ok_or_else(|| Error::new(StatusCode::NOT_FOUND, "News not found"))?;

    if news.user_id != Some(claims.sub) {
        return Err(Error::new(StatusCode::BAD_REQUEST, "Unauthorized"));
    }

    let (fields, file) = collect_form(&mut multipart, "image").await?;
    let payload = NewsPayload::from_fields(&fields)?;

    let mut replacement = None;
    if let Some(image) = file {
        if let Some(message) = image_validator(
            image.bytes.len(),
            image.content_type.as_deref(),
            state.config.image_max_bytes,
        ) {
            return Err(Error::field("image", &message));
        }
        let new_name = random_image_name(&image.file_name);
        save_image(&state.config.public_dir, &new_name, &image.bytes).await?;
        replacement = Some(new_name);
    }

    let image_name = replacement.clone().or_else(|| news.image.clone());

    let sql = format!(
        "UPDATE news SET title = $1, body = $2, image = $3, updated_at = now() \
         WHERE id = $4 RETURNING {NEWS_COLUMNS}"
    );
    let updated: Result<News, sqlx::Error> = sqlx::query_as(&sql)
        .bind(&payload.title)
        .bind(&payload.body)
        .bind(&image_name)
        .bind(id)
        .fetch_one(&state.db_pool)
        .await;

    let updated = match updated {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(new_name) = replacement.as_deref() {
                let _ = remove_image(&state.config.public_dir, new_name).await;
            }
            return Err(e.into());
        }
    };

    // The replaced file is orphaned once the row points at the new one.
    if replacement.is_some() {
        if let Some(old) = news.image.as_deref() {
            if Some(old) != updated.image.as_deref() {
                if let Err(err) = remove_image(&state.config.public_dir, old).await {
                    tracing::warn!("failed to remove replaced image {old}: {err}");
                }
            }
        }
    }

    state.news_cache.clear();

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "News updated successfully", "news": updated })),
    )
        .into_response())
}

pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    claims: Claims,
) -> Result<Response, Error> {
    let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
    let news: Option<News> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?;
    let news = news.ok_or_else(|| Error::new(StatusCode::NOT_FOUND, "News not found"))?;

    if news.user_id != Some(claims.sub) {
        return Err(Error::new(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    if let Some(image) = news.image.as_deref() {
        remove_image(&state.config.public_dir, image).await?;
    }

    sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    state.news_cache.clear();

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "News deleted successfully" })),
    )
        .into_response())
}
