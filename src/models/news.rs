use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::prelude::FromRow;

use crate::models::error::Error;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct News {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub user_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A news row joined with the narrow author projection used by the
/// listing and show queries.
#[derive(FromRow, Debug, Clone)]
pub struct NewsWithAuthor {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub user_id: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub author_profile: Option<String>,
}

/// Map a persisted row into the API shape. A row without an author still
/// transforms; `author` just comes back null.
pub fn transform(item: &NewsWithAuthor) -> Value {
    let author = item.author_id.map(|id| {
        json!({
            "id": id,
            "name": item.author_name,
            "profile": item.author_profile.as_deref().map(image_url),
        })
    });

    json!({
        "id": item.id,
        "title": item.title,
        "body": item.body,
        "image": item.image.as_deref().map(image_url),
        "author": author,
        "created_at": item.created_at,
        "updated_at": item.updated_at,
    })
}

pub fn image_url(name: &str) -> String {
    format!("/images/{name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp raw query values. Anything unusable falls back to the
    /// defaults instead of rejecting the request.
    pub fn clamp(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p,
            _ => Self::DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l > 0 && l <= Self::MAX_LIMIT => l,
            _ => Self::DEFAULT_LIMIT,
        };
        Pagination { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

/// Text fields of a create/update request after validation.
#[derive(Debug, Clone, Serialize)]
pub struct NewsPayload {
    pub title: String,
    pub body: String,
}

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 200;
pub const BODY_MIN: usize = 10;
pub const BODY_MAX: usize = 30_000;

impl NewsPayload {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, Error> {
        let title = fields.get("title").map(|t| t.trim()).unwrap_or("");
        let body = fields.get("body").map(|b| b.trim()).unwrap_or("");

        let mut errors = Map::new();
        if title.len() < TITLE_MIN {
            errors.insert(
                "title".into(),
                Value::String(format!("Title must be at least {TITLE_MIN} characters")),
            );
        } else if title.len() > TITLE_MAX {
            errors.insert(
                "title".into(),
                Value::String(format!("Title must be at most {TITLE_MAX} characters")),
            );
        }
        if body.len() < BODY_MIN {
            errors.insert(
                "body".into(),
                Value::String(format!("Body must be at least {BODY_MIN} characters")),
            );
        } else if body.len() > BODY_MAX {
            errors.insert(
                "body".into(),
                Value::String(format!("Body must be at most {BODY_MAX} characters")),
            );
        }
        if !errors.is_empty() {
            return Err(Error::validation(errors));
        }

        Ok(NewsPayload {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_when_absent() {
        assert_eq!(
            Pagination::clamp(None, None),
            Pagination { page: 1, limit: 10 }
        );
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(
            Pagination::clamp(Some(0), Some(0)),
            Pagination { page: 1, limit: 10 }
        );
        assert_eq!(
            Pagination::clamp(Some(-3), Some(101)),
            Pagination { page: 1, limit: 10 }
        );
        assert_eq!(
            Pagination::clamp(Some(2), Some(100)),
            Pagination {
                page: 2,
                limit: 100
            }
        );
    }

    #[test]
    fn offset_is_derived_from_page_and_limit() {
        let pagination = Pagination::clamp(Some(2), Some(5));
        assert_eq!(pagination.offset(), 5);
        assert_eq!(Pagination::clamp(None, None).offset(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let pagination = Pagination::clamp(Some(2), Some(5));
        assert_eq!(pagination.total_pages(12), 3);
        assert_eq!(pagination.total_pages(10), 2);
        assert_eq!(pagination.total_pages(0), 0);
    }

    fn row(author: bool) -> NewsWithAuthor {
        NewsWithAuthor {
            id: 1,
            title: "Local cat elected mayor".into(),
            body: "An unusual election result came in overnight.".into(),
            image: Some("abc123.png".into()),
            user_id: author.then_some(7),
            created_at: None,
            updated_at: None,
            author_id: author.then_some(7),
            author_name: author.then(|| "Ada".to_string()),
            author_profile: None,
        }
    }

    #[test]
    fn transform_exposes_author_summary_and_image_url() {
        let value = transform(&row(true));
        assert_eq!(value["id"], 1);
        assert_eq!(value["image"], "/images/abc123.png");
        assert_eq!(value["author"]["id"], 7);
        assert_eq!(value["author"]["name"], "Ada");
        assert!(value["author"]["profile"].is_null());
    }

    #[test]
    fn transform_tolerates_missing_author() {
        let value = transform(&row(false));
        assert!(value["author"].is_null());
        assert_eq!(value["title"], "Local cat elected mayor");
    }

    #[test]
    fn payload_accepts_valid_fields() {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), "A valid headline".to_string());
        fields.insert("body".to_string(), "Body text long enough to pass.".to_string());
        let payload = NewsPayload::from_fields(&fields).unwrap();
        assert_eq!(payload.title, "A valid headline");
    }

    #[test]
    fn payload_rejects_missing_title_and_short_body() {
        let mut fields = HashMap::new();
        fields.insert("body".to_string(), "short".to_string());
        let error = NewsPayload::from_fields(&fields).unwrap_err();
        let errors = &error.body.0["errors"];
        assert!(errors.get("title").is_some());
        assert!(errors.get("body").is_some());
    }

    #[test]
    fn payload_rejects_overlong_title() {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), "t".repeat(TITLE_MAX + 1));
        fields.insert("body".to_string(), "Body text long enough to pass.".to_string());
        let error = NewsPayload::from_fields(&fields).unwrap_err();
        assert!(error.body.0["errors"].get("title").is_some());
    }
}
