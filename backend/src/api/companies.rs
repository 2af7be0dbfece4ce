//! Company listing API handlers
//!
//! `GET /empresas` searches, `POST /empresas` registers a company with an
//! optional photo.

use axum::{
    extract::{Multipart, Query, State},
    response::Json,
};
use tracing::{debug, info};

use crate::api::form::ListingForm;
use crate::api::{persist_photo, report_orphaned_photo};
use crate::error::AppError;
use crate::listings::{Company, CompanySearch, CreatedListing, NewCompany};
use crate::state::AppState;

/// Text fields accepted by `POST /empresas`
pub const COMPANY_FIELDS: &[&str] = &[
    "empresa",
    "tipo",
    "email",
    "telefone",
    "cidade",
    "estado",
    "cep",
    "servico",
    "atendimento",
];

/// GET /empresas - Search company listings
pub async fn search_companies(
    State(state): State<AppState>,
    Query(search): Query<CompanySearch>,
) -> Result<Json<Vec<Company>>, AppError> {
    let clause = search.to_clause();
    debug!(filters = ?search, predicates = clause.len(), "Searching companies");

    let companies = state
        .store
        .search_companies(&clause)
        .await
        .map_err(AppError::CompanySearch)?;

    info!(count = companies.len(), "Company search completed");
    Ok(Json(companies))
}

/// POST /empresas - Register a company
pub async fn create_company(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreatedListing>, AppError> {
    let mut form =
        ListingForm::read(&mut multipart, COMPANY_FIELDS, state.uploads.max_bytes()).await?;
    let company = company_from_form(&mut form);

    let foto = persist_photo(&state.uploads, &mut form).await?;

    let created = state
        .store
        .insert_company(&company, foto.as_deref())
        .await
        .map_err(|e| {
            report_orphaned_photo(foto.as_deref());
            AppError::CompanyInsert(e)
        })?;

    info!(id = created.id, foto = ?created.foto, "Company listing created");
    Ok(Json(created))
}

/// Company submissions carry no required fields; absent fields become null.
pub fn company_from_form(form: &mut ListingForm) -> NewCompany {
    NewCompany {
        empresa: form.take("empresa"),
        tipo: form.take("tipo"),
        email: form.take("email"),
        telefone: form.take("telefone"),
        cidade: form.take("cidade"),
        estado: form.take("estado"),
        cep: form.take("cep"),
        servico: form.take("servico"),
        atendimento: form.take("atendimento"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_from_form_maps_fields() {
        let mut form = ListingForm::from_parts(
            [
                ("empresa", "Clínica Vida"),
                ("tipo", "clinica"),
                ("estado", "São Paulo"),
            ],
            None,
        );

        let company = company_from_form(&mut form);
        assert_eq!(company.empresa.as_deref(), Some("Clínica Vida"));
        assert_eq!(company.tipo.as_deref(), Some("clinica"));
        assert_eq!(company.estado.as_deref(), Some("São Paulo"));
        assert_eq!(company.email, None);
        assert_eq!(company.atendimento, None);
    }

    #[test]
    fn test_company_form_keeps_empty_strings() {
        let mut form = ListingForm::from_parts([("telefone", "")], None);
        let company = company_from_form(&mut form);
        assert_eq!(company.telefone.as_deref(), Some(""));
    }
}
