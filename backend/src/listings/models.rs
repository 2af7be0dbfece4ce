//! Listing data models
//!
//! Row types returned by the read endpoints, insert payloads built from the
//! submitted forms, and the `{id, foto}` record returned after an insert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Table holding company listings
pub const COMPANY_TABLE: &str = "empresas";

/// Table holding professional listings
pub const PROFESSIONAL_TABLE: &str = "profissional";

/// Select list for company rows.
///
/// Ids and prices are cast so `SERIAL`/`BIGSERIAL` and `NUMERIC`/`DOUBLE PRECISION`
/// schemas decode the same way. `especialidade`, `genero` and `valor` are only
/// used by filters and may be missing from the table, so they are read through
/// the row's JSON form and come back null when absent.
pub const COMPANY_COLUMNS: &str = "id::bigint AS id, empresa, tipo, email, telefone, foto, \
     cidade, estado, cep, servico, atendimento, \
     to_jsonb(empresas) ->> 'especialidade' AS especialidade, \
     to_jsonb(empresas) ->> 'genero' AS genero, \
     (to_jsonb(empresas) ->> 'valor')::float8 AS valor";

/// Select list for professional rows
pub const PROFESSIONAL_COLUMNS: &str = "id::bigint AS id, nome, sobrenome, email, telefone, \
     especialidade, cr, genero, valor::float8 AS valor, atendimento, cidade, estado, cep, foto, servico";

/// A company listing as stored in `empresas`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Company {
    /// Identifier assigned by the database
    pub id: i64,
    /// Display name
    pub empresa: Option<String>,
    /// Category tag
    pub tipo: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub telefone: Option<String>,
    /// Stored photo path, relative to the static route
    pub foto: Option<String>,
    /// City
    pub cidade: Option<String>,
    /// State, matched accent-insensitively
    pub estado: Option<String>,
    /// Postal code
    pub cep: Option<String>,
    /// Service tag
    pub servico: Option<String>,
    /// Attendance mode (`presencial`, `remoto`, `ambos` or free text)
    pub atendimento: Option<String>,
    /// Specialty tag
    pub especialidade: Option<String>,
    /// Gender tag
    pub genero: Option<String>,
    /// Price
    pub valor: Option<f64>,
}

/// A professional listing as stored in `profissional`
///
/// Name, email and specialty are required on submission but decoded as
/// nullable so rows written by other clients still come back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Professional {
    /// Identifier assigned by the database
    pub id: i64,
    /// First name
    pub nome: Option<String>,
    /// Last name
    pub sobrenome: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub telefone: Option<String>,
    /// Specialty tag
    pub especialidade: Option<String>,
    /// License identifier
    pub cr: Option<String>,
    /// Gender tag
    pub genero: Option<String>,
    /// Social consultation price; null unless the flag was set on submission
    pub valor: Option<f64>,
    /// Attendance mode
    pub atendimento: Option<String>,
    /// City
    pub cidade: Option<String>,
    /// State
    pub estado: Option<String>,
    /// Postal code
    pub cep: Option<String>,
    /// Stored photo path, relative to the static route
    pub foto: Option<String>,
    /// Service tag
    pub servico: Option<String>,
}

/// Fields accepted by `POST /empresas`
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCompany {
    pub empresa: Option<String>,
    pub tipo: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub servico: Option<String>,
    pub atendimento: Option<String>,
}

/// Validated fields accepted by `POST /profissional`
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfessional {
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub especialidade: String,
    pub cr: Option<String>,
    pub genero: Option<String>,
    /// Already resolved from the social consultation flag
    pub valor: Option<f64>,
    pub atendimento: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub servico: Option<String>,
}

/// Response of both write endpoints
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CreatedListing {
    /// Identifier assigned by the database
    pub id: i64,
    /// Stored photo path, if a photo was uploaded
    pub foto: Option<String>,
}
