//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.
//!
//! Client-facing messages are the Portuguese strings the directory frontend
//! already displays; the underlying cause is only logged, except for
//! professional insert failures which also return it under `detalhes`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-level error types
///
/// All errors that can occur while serving a request are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more required form fields were empty or absent
    #[error("Campos obrigatórios faltando: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The submitted form could not be read or holds an invalid value
    #[error("Formulário inválido: {0}")]
    InvalidForm(String),

    /// The uploaded photo exceeds the size limit
    #[error("Arquivo excede o limite de {limit} bytes")]
    PayloadTooLarge {
        /// Limit that was exceeded, in bytes
        limit: usize,
    },

    /// Querying company listings failed
    #[error("Erro ao buscar empresas")]
    CompanySearch(#[source] sqlx::Error),

    /// Querying professional listings failed
    #[error("Erro ao buscar profissionais")]
    ProfessionalSearch(#[source] sqlx::Error),

    /// Inserting a company listing failed
    #[error("Erro ao adicionar empresa")]
    CompanyInsert(#[source] sqlx::Error),

    /// Inserting a professional listing failed
    #[error("Erro ao adicionar profissional")]
    ProfessionalInsert(#[source] sqlx::Error),

    /// Writing an uploaded photo to disk failed
    #[error("Erro ao salvar foto")]
    Upload(#[from] std::io::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::CompanySearch(_)
            | AppError::ProfessionalSearch(_)
            | AppError::CompanyInsert(_)
            | AppError::ProfessionalInsert(_)
            | AppError::Upload(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // Only 400s spell out which fields failed.
            AppError::MissingFields(fields) => json!({
                "error": "Campos obrigatórios faltando",
                "campos": fields,
                "status": status.as_u16(),
            }),
            // Professional inserts expose the database message for diagnostics,
            // company inserts do not.
            AppError::ProfessionalInsert(source) => json!({
                "error": self.to_string(),
                "detalhes": source.to_string(),
                "status": status.as_u16(),
            }),
            _ => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => error!(error = %self, cause = %source, "Request failed"),
                None => error!(error = %self, "Request failed"),
            }
        }

        (status, Json(body)).into_response()
    }
}
