//! HTTP router
//!
//! Wires the listing endpoints, read-only photo serving, the upload size
//! limit and the request logging middleware.

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::time::Instant;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::api::{companies, professionals};
use crate::services::uploads::PUBLIC_PREFIX;
use crate::state::AppState;

/// Room left for the text fields of a listing form on top of the photo
pub const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the application router
///
/// Listing form bodies larger than the photo limit plus
/// [`FORM_FIELDS_ALLOWANCE`] are refused with 413 before any handler runs.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.uploads.max_bytes() + FORM_FIELDS_ALLOWANCE;
    let photos = ServeDir::new(state.uploads.dir());

    let listings = Router::new()
        .route(
            "/empresas",
            get(companies::search_companies).post(companies::create_company),
        )
        .route(
            "/profissional",
            get(professionals::search_professionals).post(professionals::create_professional),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit));

    Router::new()
        .route("/health", get(health_check))
        .merge(listings)
        .nest_service(&format!("/{}", PUBLIC_PREFIX), photos)
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
