use jsonwebtoken::{EncodingKey, Header};

use crate::models::jwt::Claims;

const ACCESS_TOKEN_TTL_SECS: usize = 24 * 60 * 60;

pub fn jwt_encode(
    user_id: i32,
    email: String,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        email,
        iat: now,
        exp: now + ACCESS_TOKEN_TTL_SECS,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
