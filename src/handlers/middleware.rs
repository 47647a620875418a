use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::request::Parts;
use http::{header, StatusCode};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::models::error::Error;
use crate::models::jwt::Claims;
use crate::utils::state::AppState;

/// Pulls the acting user out of the `Authorization` header. Protected
/// handlers take `claims: Claims` as a parameter and never run for
/// unauthenticated requests.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "Missing Bearer token"))?;

        let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
        let decoded = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(
            |e| {
                Error::new(
                    StatusCode::UNAUTHORIZED,
                    &format!("Token validation failed: {}", e),
                )
            },
        )?;

        Ok(decoded.claims)
    }
}

/// Global throttle in front of every route.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let _permit = state.rate_limiter.acquire().await;
    next.run(req).await
}
