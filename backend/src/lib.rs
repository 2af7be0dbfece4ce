//! Directory Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod listings;
pub mod routes;
pub mod services;
pub mod state;

pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
