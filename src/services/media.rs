//! Media storage and upload handling.
//!
//! Uploaded files land under `uploads/YYYY/MM/<id>_<name>` relative to the
//! media root and are served back from the configured public prefix.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use sha2::{Digest, Sha256};
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
    models::upload::UploadResult,
    slug,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Longest stem kept in a stored file name, in bytes
const MAX_STEM_LEN: usize = 100;

/// Image types accepted for equipment pictures
const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Storage backend for uploaded media
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Write `data` under `name`, relative to the storage root
    async fn write(&self, name: &str, data: &[u8]) -> AppResult<()>;

    /// Public URL of a stored name
    fn public_url(&self, name: &str) -> String;
}

/// Media stored on the local filesystem
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a relative name below the root, refusing traversal
    fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || name.is_empty() {
            return Err(AppError::Storage(format!("Refusing to store outside media root: {}", name)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn write(&self, name: &str, data: &[u8]) -> AppResult<()> {
        let path = self.resolve(name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", path.display(), e)))?;
        file.write_all(data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush {}: {}", path.display(), e)))?;

        tracing::debug!(name = %name, path = ?path, size = data.len(), "media file written");
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

/// What an upload is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Any file, reported under the `file` field
    File,
    /// Equipment picture, reported under the `image` field
    Image,
}

impl UploadKind {
    fn field(&self) -> &'static str {
        match self {
            UploadKind::File => "file",
            UploadKind::Image => "image",
        }
    }
}

#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn MediaStorage>,
    max_upload_bytes: usize,
}

impl MediaService {
    pub fn new(storage: Arc<dyn MediaStorage>, config: &MediaConfig) -> Self {
        Self {
            storage,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Validate and store an uploaded file
    pub async fn store(
        &self,
        kind: UploadKind,
        original_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> AppResult<UploadResult> {
        let field = kind.field();
        if data.is_empty() {
            return Err(AppError::field(field, "empty", "The submitted file is empty"));
        }
        if data.len() > self.max_upload_bytes {
            return Err(AppError::field(
                field,
                "too_large",
                format!(
                    "File is too large ({} bytes, at most {} allowed)",
                    data.len(),
                    self.max_upload_bytes
                ),
            ));
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        if kind == UploadKind::Image && !IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::field(
                field,
                "invalid_image",
                "Upload a valid image (JPEG, PNG, GIF or WebP)",
            ));
        }

        let unique = uuid::Uuid::now_v7().simple().to_string();
        let name = storage_name(original_name, Utc::now(), &unique[..8]);
        self.storage.write(&name, data).await?;

        let sha256 = hex::encode(Sha256::digest(data));
        tracing::info!(name = %name, size = data.len(), content_type = %content_type, "file uploaded");

        Ok(UploadResult {
            url: self.storage.public_url(&name),
            name,
            original_name: original_name.to_string(),
            content_type,
            size: data.len() as i64,
            sha256,
        })
    }
}

/// `uploads/YYYY/MM/<unique>_<safe name>`
pub fn storage_name(original_name: &str, now: DateTime<Utc>, unique: &str) -> String {
    format!(
        "uploads/{:04}/{:02}/{}_{}",
        now.year(),
        now.month(),
        unique,
        sanitize_filename(original_name)
    )
}

/// Transliterated, lower-case file name keeping a short alphanumeric extension
pub fn sanitize_filename(original_name: &str) -> String {
    // Browsers on Windows may send a full path
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let stem = slug::slugify_or(stem, "file");
    let stem = slug::truncate(&stem, MAX_STEM_LEN);
    let extension: Option<String> = extension
        .map(|ext| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(10)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}
