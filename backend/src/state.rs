//! Shared application state
//!
//! Handlers receive the listing store and the upload sink through axum `State`.
//! Both are created once at startup; cloning the state is cheap.

use std::sync::Arc;

use crate::listings::ListingStore;
use crate::services::UploadSink;

/// State injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// Listing storage (a Postgres pool in production)
    pub store: Arc<dyn ListingStore>,
    /// Photo storage
    pub uploads: UploadSink,
}

impl AppState {
    /// Create state from its parts
    pub fn new(store: Arc<dyn ListingStore>, uploads: UploadSink) -> Self {
        Self { store, uploads }
    }
}
