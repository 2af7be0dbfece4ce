//! Multipart form parsing shared by the listing write endpoints
//!
//! Text fields are collected by name and the optional `foto` part is buffered
//! in memory (bounded by the upload limit) so that validation can run before
//! anything touches the disk.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::error::AppError;
use crate::services::uploads::{PhotoUpload, PHOTO_FIELD};

/// A parsed listing submission
#[derive(Debug, Default)]
pub struct ListingForm {
    fields: HashMap<String, String>,
    photo: Option<PhotoUpload>,
}

impl ListingForm {
    /// Read every part of `multipart`
    ///
    /// # Arguments
    /// * `multipart` - Request body
    /// * `known_fields` - Text fields the endpoint understands; others are logged and skipped
    /// * `max_photo_bytes` - Largest accepted `foto` part
    ///
    /// # Returns
    /// * `Ok(ListingForm)` - Collected fields and optional photo
    /// * `Err(AppError)` - Malformed body or oversized photo
    pub async fn read(
        multipart: &mut Multipart,
        known_fields: &[&str],
        max_photo_bytes: usize,
    ) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_photo_bytes))?
        {
            let field_name = field.name().unwrap_or("").to_string();

            if field_name == PHOTO_FIELD {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = read_limited(field, max_photo_bytes).await?;

                // Browsers send an empty, unnamed part when no file was picked.
                match file_name {
                    Some(file_name) if !file_name.is_empty() && !data.is_empty() => {
                        form.photo = Some(PhotoUpload { file_name, data });
                    }
                    _ => {}
                }
            } else if known_fields.contains(&field_name.as_str()) {
                let text = field.text().await.map_err(|e| {
                    error!("Failed to read {} field: {}", field_name, e);
                    multipart_error(e, max_photo_bytes)
                })?;
                form.fields.insert(field_name, text);
            } else {
                warn!("Unknown multipart field: {}", field_name);
            }
        }

        Ok(form)
    }

    /// Build a form from already decoded values
    pub fn from_parts<I, K, V>(fields: I, photo: Option<PhotoUpload>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            photo,
        }
    }

    /// Borrow a text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Move a text field out of the form
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Move the photo out of the form
    pub fn take_photo(&mut self) -> Option<PhotoUpload> {
        self.photo.take()
    }

    /// True when a photo was submitted
    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if data.len() + chunk.len() > max_bytes {
            error!(
                "Photo exceeds limit: more than {} bytes received",
                max_bytes
            );
            return Err(AppError::PayloadTooLarge { limit: max_bytes });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Body-level length errors surface as 413, everything else as a bad form.
fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::InvalidForm(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_moves_field_out() {
        let mut form = ListingForm::from_parts([("nome", "Ana")], None);
        assert_eq!(form.text("nome"), Some("Ana"));
        assert_eq!(form.take("nome"), Some("Ana".to_string()));
        assert_eq!(form.text("nome"), None);
    }

    #[test]
    fn test_take_photo_only_once() {
        let photo = PhotoUpload {
            file_name: "a.png".to_string(),
            data: vec![1, 2, 3],
        };
        let mut form = ListingForm::from_parts(Vec::<(String, String)>::new(), Some(photo));
        assert!(form.has_photo());
        assert!(form.take_photo().is_some());
        assert!(form.take_photo().is_none());
    }
}
