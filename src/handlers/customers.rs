use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{
    created_response, map_service_error, message_response, success_response, IdPath, OneOrMany,
    ValidJson,
};
use crate::auth::Actor;
use crate::errors::ApiError;
use crate::services::customers::{BulkCreateOutcome, CustomerInput, CustomerView, TermsInput};
use crate::{ApiResponse, AppState};

/// Creates the router for customer endpoints
pub fn customers_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_customers))
        .route("/customers", get(list_customers))
        .route("/getcustomerbyId/{id}", get(get_customer))
        .route("/update/{id}", put(update_customer))
        .route("/{id}/disable", put(disable_customer))
        .route("/{id}/enable", put(enable_customer))
        .route("/{id}/saveTerms", put(save_terms))
        .route("/{id}", delete(delete_customer))
}

/// Create one customer or a batch
///
/// Each element is inserted independently; the response lists one result
/// per element in request order.
#[utoipa::path(
    post,
    path = "/customer_registration/create",
    summary = "Create customers",
    request_body = Vec<CustomerInput>,
    responses(
        (status = 201, description = "Per-element results", body = ApiResponse<Vec<BulkCreateOutcome>>),
        (status = 400, description = "Malformed body", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn create_customers(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<OneOrMany<serde_json::Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let outcomes = state
        .services
        .customers
        .bulk_create(payload.into_vec(), actor.id())
        .await;

    Ok(created_response(outcomes))
}

#[utoipa::path(
    get,
    path = "/customer_registration/customers",
    summary = "List customers",
    responses(
        (status = 200, description = "Visible customers, newest first", body = ApiResponse<Vec<CustomerView>>),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = state
        .services
        .customers
        .list_customers()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(
        customers.into_iter().map(CustomerView::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/customer_registration/getcustomerbyId/{id}",
    summary = "Get a customer",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerView>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get_customer(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CustomerView::from(customer)))
}

#[utoipa::path(
    put,
    path = "/customer_registration/update/{id}",
    summary = "Replace a customer",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerView>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<CustomerInput>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .update_customer(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CustomerView::from(customer)))
}

#[utoipa::path(
    put,
    path = "/customer_registration/{id}/disable",
    summary = "Disable a customer",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer disabled", body = ApiResponse<CustomerView>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn disable_customer(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .set_active(id, false, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CustomerView::from(customer)))
}

#[utoipa::path(
    put,
    path = "/customer_registration/{id}/enable",
    summary = "Enable a customer",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer enabled", body = ApiResponse<CustomerView>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn enable_customer(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .set_active(id, true, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CustomerView::from(customer)))
}

#[utoipa::path(
    put,
    path = "/customer_registration/{id}/saveTerms",
    summary = "Save customer terms",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = TermsInput,
    responses(
        (status = 200, description = "Terms saved", body = ApiResponse<CustomerView>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn save_terms(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<TermsInput>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .save_terms(id, payload.terms, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CustomerView::from(customer)))
}

#[utoipa::path(
    delete,
    path = "/customer_registration/{id}",
    summary = "Soft delete a customer",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<String>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .customers
        .delete_customer(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}
