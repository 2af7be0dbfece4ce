//! Shared helpers for router integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use directory_backend::listings::{
    BindValue, Company, CreatedListing, FilterClause, ListingStore, NewCompany, NewProfessional,
    Professional,
};
use directory_backend::services::uploads::{MAX_PHOTO_BYTES, PUBLIC_PREFIX};
use directory_backend::services::UploadSink;
use directory_backend::{build_router, AppState};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// A search as seen by the store: rendered SQL predicate plus binds
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    pub companies: Vec<Company>,
    pub professionals: Vec<Professional>,
    pub fail: bool,
    next_id: AtomicI64,
    pub searches: Mutex<Vec<RecordedSearch>>,
    pub company_inserts: Mutex<Vec<(NewCompany, Option<String>)>>,
    pub professional_inserts: Mutex<Vec<(NewProfessional, Option<String>)>>,
}

impl RecordingStore {
    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            companies,
            ..Default::default()
        }
    }

    pub fn with_professionals(professionals: Vec<Professional>) -> Self {
        Self {
            professionals,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn record(&self, filter: &FilterClause) {
        self.searches.lock().unwrap().push(RecordedSearch {
            sql: filter.to_sql(),
            binds: filter.binds().cloned().collect(),
        });
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail {
            Err(sqlx::Error::Protocol(
                "relation \"empresas\" does not exist".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn created(&self, foto: Option<&str>) -> CreatedListing {
        CreatedListing {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            foto: foto.map(str::to_string),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.company_inserts.lock().unwrap().len() + self.professional_inserts.lock().unwrap().len()
    }

    pub fn last_search(&self) -> RecordedSearch {
        self.searches
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no search was recorded")
    }
}

#[async_trait]
impl ListingStore for RecordingStore {
    async fn search_companies(&self, filter: &FilterClause) -> Result<Vec<Company>, sqlx::Error> {
        self.record(filter);
        self.check()?;
        Ok(self.companies.clone())
    }

    async fn search_professionals(
        &self,
        filter: &FilterClause,
    ) -> Result<Vec<Professional>, sqlx::Error> {
        self.record(filter);
        self.check()?;
        Ok(self.professionals.clone())
    }

    async fn insert_company(
        &self,
        company: &NewCompany,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error> {
        self.check()?;
        self.company_inserts
            .lock()
            .unwrap()
            .push((company.clone(), foto.map(str::to_string)));
        Ok(self.created(foto))
    }

    async fn insert_professional(
        &self,
        professional: &NewProfessional,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error> {
        self.check()?;
        self.professional_inserts
            .lock()
            .unwrap()
            .push((professional.clone(), foto.map(str::to_string)));
        Ok(self.created(foto))
    }
}

/// Router wired to `store` with photos written under `upload_dir`
pub fn test_app(store: Arc<RecordingStore>, upload_dir: &Path) -> Router {
    let uploads = UploadSink::new(upload_dir, PUBLIC_PREFIX, MAX_PHOTO_BYTES);
    build_router(AppState::new(store, uploads))
}

/// Minimal `multipart/form-data` encoder
pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "----directory-test-boundary".to_string(),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .header(header::CONTENT_LENGTH, self.buf.len())
            .body(Body::from(self.buf))
            .expect("failed to build request")
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

/// A professional submission with every required field filled in
pub fn professional_form() -> MultipartBody {
    MultipartBody::new()
        .text("nome", "Ana")
        .text("sobrenome", "Souza")
        .text("email", "ana@example.com")
        .text("telefone", "11 99999-0000")
        .text("especialidade", "Psicologia")
        .text("cr", "CRP 06/12345")
        .text("genero", "feminino")
        .text("atendimento", "remoto")
        .text("cidade", "São Paulo")
        .text("estado", "SP")
        .text("cep", "01310-200")
        .text("servico", "terapia")
}

pub fn company_form() -> MultipartBody {
    MultipartBody::new()
        .text("empresa", "Clínica Vida")
        .text("tipo", "clinica")
        .text("email", "contato@vida.example")
        .text("telefone", "11 3333-0000")
        .text("cidade", "Campinas")
        .text("estado", "São Paulo")
        .text("cep", "13010-000")
        .text("servico", "fisioterapia")
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
