//! HTTP controllers. Each module exposes a `*_routes()` router that
//! `app_router` nests under its base path.

pub mod auth;
pub mod common;
pub mod customers;
pub mod machinery;
pub mod materials;
pub mod quotations;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
