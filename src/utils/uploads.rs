use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use http::StatusCode;
use uuid::Uuid;

use crate::models::error::Error;

pub const SUPPORTED_TYPES: [&str; 5] = [
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/webp",
    "image/gif",
];

/// A file lifted out of a multipart request, held in memory until it
/// passes validation and lands in the public image store.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Split a multipart body into its text fields and the file uploaded
/// under `file_field`, if any.
pub async fn collect_form(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<(HashMap<String, String>, Option<UploadedFile>), Error> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field && field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(|c| c.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e.to_string()))?
                .to_vec();
            file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| Error::new(StatusCode::BAD_REQUEST, &e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, file))
}

/// Accept or reject a candidate upload against the size cap and the
/// media type allow-list. `None` means the image is fine. A missing
/// media type is a rejection, never a panic.
pub fn image_validator(size: usize, content_type: Option<&str>, max_bytes: usize) -> Option<String> {
    if size > max_bytes {
        return Some(format!(
            "Image size must not exceed {} MB",
            max_bytes / (1024 * 1024)
        ));
    }
    match content_type {
        Some(mime) if SUPPORTED_TYPES.contains(&mime) => None,
        _ => Some("Image must be one of png, jpg, jpeg, webp or gif".to_string()),
    }
}

/// Collision-resistant name for a stored upload. The original extension
/// is kept so the file stays addressable by type.
pub fn random_image_name(original: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match Path::new(original).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{stem}.{}", ext.to_lowercase()),
        _ => stem,
    }
}

pub fn image_path(public_dir: &str, name: &str) -> PathBuf {
    Path::new(public_dir).join("images").join(name)
}

/// Land the upload at its generated path, creating the images directory
/// on first use.
pub async fn save_image(
    public_dir: &str,
    name: &str,
    bytes: &[u8],
) -> Result<(), std::io::Error> {
    let path = image_path(public_dir, name);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await
}

/// Remove a stored image. A file that is already gone is not an error.
pub async fn remove_image(public_dir: &str, name: &str) -> Result<(), std::io::Error> {
    match tokio::fs::remove_file(image_path(public_dir, name)).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
