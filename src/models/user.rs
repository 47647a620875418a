use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::prelude::FromRow;

use crate::models::error::Error;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub profile: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration fields after validation, ready to persist.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub const PASSWORD_MIN: usize = 6;

impl RegisterPayload {
    pub fn validate(&self) -> Result<NewUser, Error> {
        let name = self.name.as_deref().unwrap_or("").trim();
        let email = self.email.as_deref().unwrap_or("").trim();
        let password = self.password.as_deref().unwrap_or("");

        let mut errors = Map::new();
        if name.is_empty() {
            errors.insert("name".into(), Value::String("Name is required".into()));
        }
        if email.is_empty() {
            errors.insert("email".into(), Value::String("Email is required".into()));
        } else if !email.contains('@') {
            errors.insert(
                "email".into(),
                Value::String("Email must be a valid email address".into()),
            );
        }
        if password.len() < PASSWORD_MIN {
            errors.insert(
                "password".into(),
                Value::String(format!(
                    "Password must be at least {PASSWORD_MIN} characters"
                )),
            );
        }
        if !errors.is_empty() {
            return Err(Error::validation(errors));
        }

        Ok(NewUser {
            name: name.to_string(),
            email: email.to_lowercase(),
            password: password.to_string(),
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    pub fn validate(&self) -> Result<(String, String), Error> {
        let email = self.email.as_deref().unwrap_or("").trim();
        let password = self.password.as_deref().unwrap_or("");

        let mut errors = Map::new();
        if email.is_empty() {
            errors.insert("email".into(), Value::String("Email is required".into()));
        }
        if password.is_empty() {
            errors.insert(
                "password".into(),
                Value::String("Password is required".into()),
            );
        }
        if !errors.is_empty() {
            return Err(Error::validation(errors));
        }

        Ok((email.to_lowercase(), password.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_registration_is_normalized() {
        let payload = RegisterPayload {
            name: Some("  Ada  ".into()),
            email: Some("Ada@Example.com".into()),
            password: Some("secret42".into()),
        };
        let user = payload.validate().unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn registration_collects_every_field_error() {
        let error = RegisterPayload::default().validate().unwrap_err();
        let errors = &error.body.0["errors"];
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let payload = RegisterPayload {
            name: Some("Ada".into()),
            email: Some("not-an-email".into()),
            password: Some("secret42".into()),
        };
        let error = payload.validate().unwrap_err();
        assert!(error.body.0["errors"].get("email").is_some());
    }

    #[test]
    fn short_password_is_rejected() {
        let payload = RegisterPayload {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            password: Some("tiny".into()),
        };
        let error = payload.validate().unwrap_err();
        assert!(error.body.0["errors"].get("password").is_some());
    }

    #[test]
    fn login_requires_both_fields() {
        let error = LoginPayload::default().validate().unwrap_err();
        let errors = &error.body.0["errors"];
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
    }
}
