//! Professional listing API handlers
//!
//! `GET /profissional` searches, `POST /profissional` registers a
//! professional with an optional photo after checking the required fields.

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
};
use tracing::{debug, info};

use crate::api::form::ListingForm;
use crate::api::{persist_photo, report_orphaned_photo};
use crate::error::AppError;
use crate::listings::{CreatedListing, NewProfessional, Professional, ProfessionalSearch};
use crate::state::AppState;

/// Text fields accepted by `POST /profissional`
pub const PROFESSIONAL_FIELDS: &[&str] = &[
    "nome",
    "sobrenome",
    "email",
    "telefone",
    "especialidade",
    "cr",
    "genero",
    "valor",
    "atendimento",
    "cidade",
    "estado",
    "cep",
    "servico",
    "consultaSocial",
];

/// Fields that must be present and non-empty
pub const REQUIRED_FIELDS: [&str; 4] = ["nome", "sobrenome", "email", "especialidade"];

/// `consultaSocial` value that enables the price
pub const SOCIAL_CONSULTATION_ENABLED: &str = "sim";

/// GET /profissional - Search professional listings
pub async fn search_professionals(
    State(state): State<AppState>,
    Query(search): Query<ProfessionalSearch>,
) -> Result<Json<Vec<Professional>>, AppError> {
    let clause = search.to_clause();
    debug!(filters = ?search, predicates = clause.len(), "Searching professionals");

    let professionals = state
        .store
        .search_professionals(&clause)
        .await
        .map_err(AppError::ProfessionalSearch)?;

    info!(count = professionals.len(), "Professional search completed");
    Ok(Json(professionals))
}

/// POST /profissional - Register a professional
///
/// Validation runs before the photo is written, so a rejected submission
/// leaves neither a row nor a file behind.
pub async fn create_professional(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreatedListing>, AppError> {
    let mut form = ListingForm::read(
        &mut multipart,
        PROFESSIONAL_FIELDS,
        state.uploads.max_bytes(),
    )
    .await?;
    let professional = professional_from_form(&mut form)?;
    debug!(professional = ?professional, photo = form.has_photo(), "Registering professional");

    let foto = persist_photo(&state.uploads, &mut form).await?;

    let created = state
        .store
        .insert_professional(&professional, foto.as_deref())
        .await
        .map_err(|e| {
            report_orphaned_photo(foto.as_deref());
            AppError::ProfessionalInsert(e)
        })?;

    info!(id = created.id, foto = ?created.foto, "Professional listing created");
    Ok(Json(created))
}

/// Validate and convert a submission
///
/// # Returns
/// * `Ok(NewProfessional)` - All required fields present, price resolved
/// * `Err(AppError::MissingFields)` - A required field is absent or empty
/// * `Err(AppError::InvalidForm)` - The social consultation price is not a number
pub fn professional_from_form(form: &mut ListingForm) -> Result<NewProfessional, AppError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|name| form.text(name).map_or(true, str::is_empty))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let valor = social_consultation_price(form.text("consultaSocial"), form.text("valor"))?;

    Ok(NewProfessional {
        nome: form.take("nome").unwrap_or_default(),
        sobrenome: form.take("sobrenome").unwrap_or_default(),
        email: form.take("email").unwrap_or_default(),
        telefone: form.take("telefone"),
        especialidade: form.take("especialidade").unwrap_or_default(),
        cr: form.take("cr"),
        genero: form.take("genero"),
        valor,
        atendimento: form.take("atendimento"),
        cidade: form.take("cidade"),
        estado: form.take("estado"),
        cep: form.take("cep"),
        servico: form.take("servico"),
    })
}

/// Price stored for a submission.
///
/// Null unless `consultaSocial` is `sim`; then the submitted value, or `0`
/// when none was given. A comma is accepted as decimal separator.
pub fn social_consultation_price(
    flag: Option<&str>,
    raw: Option<&str>,
) -> Result<Option<f64>, AppError> {
    if flag != Some(SOCIAL_CONSULTATION_ENABLED) {
        return Ok(None);
    }

    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Some(0.0)),
        Some(value) => value
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| AppError::InvalidForm(format!("valor inválido: {}", value))),
    }
}
