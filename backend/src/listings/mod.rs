//! Listings module
//!
//! Company and professional listings: row models, the search filter builder,
//! and Postgres storage.

pub mod db;
pub mod filter;
pub mod models;

pub use db::{ListingStore, PgListingStore};
pub use filter::{BindValue, CompanySearch, FilterClause, ProfessionalSearch};
pub use models::{Company, CreatedListing, NewCompany, NewProfessional, Professional};
