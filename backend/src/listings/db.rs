//! Listing database operations
//!
//! `ListingStore` is the seam handlers talk to; `PgListingStore` is the
//! Postgres implementation backed by a shared `sqlx` pool.

use crate::listings::filter::{BindValue, FilterClause};
use crate::listings::models::{
    Company, CreatedListing, NewCompany, NewProfessional, Professional, COMPANY_COLUMNS,
    COMPANY_TABLE, PROFESSIONAL_COLUMNS, PROFESSIONAL_TABLE,
};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::{debug, info};

const INSERT_COMPANY: &str = r#"
    INSERT INTO empresas (
        empresa, tipo, email, telefone, foto,
        cidade, estado, cep, servico, atendimento
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    RETURNING id::bigint AS id, foto
"#;

const INSERT_PROFESSIONAL: &str = r#"
    INSERT INTO profissional (
        nome, sobrenome, email, telefone,
        especialidade, cr, genero, valor,
        atendimento, cidade, estado, cep,
        foto, servico
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
            $9, $10, $11, $12, $13, $14)
    RETURNING id::bigint AS id, foto
"#;

/// Storage operations needed by the listing handlers
///
/// Every method performs exactly one database round trip. Errors are returned
/// untouched so each handler can decide how much of them the client sees.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Company rows matching `filter`, in storage order
    async fn search_companies(&self, filter: &FilterClause) -> Result<Vec<Company>, sqlx::Error>;

    /// Professional rows matching `filter`, in storage order
    async fn search_professionals(
        &self,
        filter: &FilterClause,
    ) -> Result<Vec<Professional>, sqlx::Error>;

    /// Insert a company referencing an already stored photo
    async fn insert_company(
        &self,
        company: &NewCompany,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error>;

    /// Insert a professional referencing an already stored photo
    async fn insert_professional(
        &self,
        professional: &NewProfessional,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error>;
}

/// Postgres-backed listing store
#[derive(Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    /// Open a connection pool
    ///
    /// # Arguments
    /// * `database_url` - Postgres connection string
    /// * `max_connections` - Upper bound on pooled connections
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection; used on shutdown
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn bind_filter<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &FilterClause,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in filter.binds() {
        query = match value {
            BindValue::Text(text) => query.bind(text.clone()),
            BindValue::Number(number) => query.bind(*number),
        };
    }
    query
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn search_companies(&self, filter: &FilterClause) -> Result<Vec<Company>, sqlx::Error> {
        let sql = filter.select(COMPANY_TABLE, COMPANY_COLUMNS);
        debug!(sql = %sql, binds = filter.len(), "Searching companies");

        bind_filter(sqlx::query_as::<_, Company>(&sql), filter)
            .fetch_all(&self.pool)
            .await
    }

    async fn search_professionals(
        &self,
        filter: &FilterClause,
    ) -> Result<Vec<Professional>, sqlx::Error> {
        let sql = filter.select(PROFESSIONAL_TABLE, PROFESSIONAL_COLUMNS);
        debug!(sql = %sql, binds = filter.len(), "Searching professionals");

        bind_filter(sqlx::query_as::<_, Professional>(&sql), filter)
            .fetch_all(&self.pool)
            .await
    }

    async fn insert_company(
        &self,
        company: &NewCompany,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error> {
        let created = sqlx::query_as::<_, CreatedListing>(INSERT_COMPANY)
            .bind(&company.empresa)
            .bind(&company.tipo)
            .bind(&company.email)
            .bind(&company.telefone)
            .bind(foto)
            .bind(&company.cidade)
            .bind(&company.estado)
            .bind(&company.cep)
            .bind(&company.servico)
            .bind(&company.atendimento)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = created.id, "Inserted company");
        Ok(created)
    }

    async fn insert_professional(
        &self,
        professional: &NewProfessional,
        foto: Option<&str>,
    ) -> Result<CreatedListing, sqlx::Error> {
        let created = sqlx::query_as::<_, CreatedListing>(INSERT_PROFESSIONAL)
            .bind(&professional.nome)
            .bind(&professional.sobrenome)
            .bind(&professional.email)
            .bind(&professional.telefone)
            .bind(&professional.especialidade)
            .bind(&professional.cr)
            .bind(&professional.genero)
            .bind(professional.valor)
            .bind(&professional.atendimento)
            .bind(&professional.cidade)
            .bind(&professional.estado)
            .bind(&professional.cep)
            .bind(foto)
            .bind(&professional.servico)
            .fetch_one(&self.pool)
            .await?;

        debug!(id = created.id, "Inserted professional");
        Ok(created)
    }
}
