use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;

#[derive(Debug)]
pub struct Error {
    pub code: StatusCode,
    pub body: Json<Value>,
}

impl Error {
    pub fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            body: Json(json!({ "message": message })),
        }
    }

    /// A 400 carrying per-field messages under an `errors` key.
    pub fn validation(errors: Map<String, Value>) -> Self {
        Self {
            code: StatusCode::BAD_REQUEST,
            body: Json(json!({ "errors": errors })),
        }
    }

    /// Single-field variant of [`Error::validation`].
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = Map::new();
        errors.insert(field.to_string(), Value::String(message.to_string()));
        Self::validation(errors)
    }

    /// The generic 500 body. Internal detail stays in the logs.
    pub fn server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong. Please try again.",
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.code, self.body).into_response()
    }
}

impl From<(StatusCode, &str)> for Error {
    fn from((code, msg): (StatusCode, &str)) -> Self {
        Self::new(code, msg)
    }
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        tracing::error!("database error: {error}");
        Self::server_error()
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        tracing::error!("filesystem error: {error}");
        Self::server_error()
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("token error: {error}");
        Self::server_error()
    }
}

impl From<argon2::password_hash::errors::Error> for Error {
    fn from(error: argon2::password_hash::errors::Error) -> Self {
        tracing::error!("password hash error: {error}");
        Self::server_error()
    }
}
