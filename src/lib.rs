//! Quotation API Library
//!
//! Back end for manufacturing quotations: customers, materials, machinery
//! process pricing and multi-line quotations.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::ToSchema;

use crate::auth::{AuthConfig, AuthService};
use crate::db::{DatabaseAccess, DbPool};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseAccess,
    pub config: config::AppConfig,
    pub auth: Arc<AuthService>,
    pub services: services::AppServices,
}

impl AppState {
    /// Wires the auth service and every entity service over one pool
    pub fn new(pool: Arc<DbPool>, config: config::AppConfig) -> Self {
        let db = DatabaseAccess::new(pool);
        let auth = Arc::new(AuthService::new(AuthConfig::from(&config)));
        let services =
            services::AppServices::new(db.clone(), auth.clone(), config.default_company_code.clone());

        Self {
            db,
            config,
            auth,
            services,
        }
    }
}

// Common response wrappers
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    /// Successful response with no payload beyond a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Every route of the service with request id, optional bearer auth and
/// HTTP tracing applied. CORS is layered on by the caller.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", handlers::auth::auth_routes())
        .nest(
            "/customer_registration",
            handlers::customers::customers_routes(),
        )
        .nest("/materials", handlers::materials::materials_routes())
        .nest("/machinery-master", handlers::machinery::machinery_routes())
        .nest("/quotations", handlers::quotations::quotations_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Resolve the acting user from an optional bearer token
        .layer(axum::middleware::from_fn_with_state(
            state.auth.clone(),
            auth::optional_auth_middleware,
        ))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

/// Builds the CORS layer from configuration.
///
/// Explicit origins win; otherwise the layer is permissive in development or
/// when explicitly allowed, and missing configuration is an error.
pub fn cors_layer(cfg: &config::AppConfig) -> anyhow::Result<CorsLayer> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(cfg.cors_allow_credentials));
    }

    if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        return Ok(CorsLayer::permissive());
    }

    anyhow::bail!(
        "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
    )
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let healthy = db::check_connection(state.db.conn()).await.is_ok();

    let health_data = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "checks": {
            "database": if healthy { "healthy" } else { "unhealthy" },
        },
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    });

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod cors_tests {
    use super::*;
    use crate::config::AppConfig;

    fn config(environment: &str) -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "a-test-secret-that-is-long-enough-123".into(),
            "127.0.0.1".into(),
            8081,
            environment.into(),
        )
    }

    #[test]
    fn development_falls_back_to_permissive() {
        assert!(cors_layer(&config("development")).is_ok());
    }

    #[test]
    fn production_without_origins_is_rejected() {
        assert!(cors_layer(&config("production")).is_err());
    }

    #[test]
    fn production_with_origins_is_accepted() {
        let mut cfg = config("production");
        cfg.cors_allowed_origins = Some("https://quotes.example.com".into());
        assert!(cors_layer(&cfg).is_ok());
    }
}
