//! API module
//!
//! Contains HTTP request handlers for the listing endpoints

pub mod companies;
pub mod form;
pub mod professionals;

use tracing::warn;

use crate::error::AppError;
use crate::services::UploadSink;
use form::ListingForm;

/// Store the submitted photo, if any, returning its public path
pub(crate) async fn persist_photo(
    uploads: &UploadSink,
    form: &mut ListingForm,
) -> Result<Option<String>, AppError> {
    match form.take_photo() {
        Some(photo) => Ok(Some(uploads.store(&photo).await?)),
        None => Ok(None),
    }
}

/// A photo written before a failed insert stays on disk with nothing pointing at it.
pub(crate) fn report_orphaned_photo(foto: Option<&str>) {
    if let Some(path) = foto {
        warn!(foto = %path, "Insert failed after photo was stored; file left orphaned");
    }
}
