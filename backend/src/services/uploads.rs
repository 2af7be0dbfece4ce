//! Photo upload storage
//!
//! Writes uploaded listing photos into a flat directory and hands back the
//! path under which the static route serves them.

use crate::error::AppError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// Multipart field carrying the listing photo
pub const PHOTO_FIELD: &str = "foto";

/// Maximum accepted photo size (5 MiB)
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix (without leading slash) under which stored photos are served
pub const PUBLIC_PREFIX: &str = "uploads";

/// A photo received in a form submission, held in memory until stored
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Filename as sent by the client
    pub file_name: String,
    /// Raw file contents
    pub data: Vec<u8>,
}

/// Stores photos on local disk
#[derive(Debug, Clone)]
pub struct UploadSink {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl UploadSink {
    /// Create a sink writing to `dir` and reporting paths under `public_prefix`
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
            max_bytes,
        }
    }

    /// Directory photos are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted photo, in bytes
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Persist `photo` under a fresh unique name
    ///
    /// # Returns
    /// * `Ok(String)` - Public path of the stored file, e.g. `uploads/foto-...jpg`
    /// * `Err(AppError)` - If the photo is too large or the write failed
    pub async fn store(&self, photo: &PhotoUpload) -> Result<String, AppError> {
        if photo.data.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        fs::create_dir_all(&self.dir).await?;

        let file_name = unique_file_name(&photo.file_name);
        let path = self.dir.join(&file_name);

        if let Err(e) = write_file(&path, &photo.data).await {
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!("Failed to remove partial upload {}: {}", path.display(), cleanup);
            }
            return Err(e.into());
        }

        info!(
            "Saved uploaded photo: {} ({} bytes)",
            file_name,
            photo.data.len()
        );

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

/// Build `foto-<unix millis>-<random><.ext>`, keeping the original extension
/// when it is plain ASCII alphanumeric.
pub fn unique_file_name(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!(
        "{}-{}-{}{}",
        PHOTO_FIELD,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    )
}
