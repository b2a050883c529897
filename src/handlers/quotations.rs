use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use super::common::{
    created_response, map_service_error, message_response, success_response, IdPath, ValidJson,
};
use crate::auth::Actor;
use crate::entities::quotation;
use crate::errors::ApiError;
use crate::services::quotations::{QuotationDetail, QuotationInput, StatusInput};
use crate::{ApiResponse, AppState};

pub fn quotations_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_quotation))
        .route("/getAll", get(list_quotations))
        .route("/{id}", get(get_quotation).delete(delete_quotation))
        .route("/{id}/status", put(update_status))
}

/// Create a quotation with its lines
///
/// Header and lines are written in one transaction.
#[utoipa::path(
    post,
    path = "/quotations/create",
    summary = "Create a quotation",
    request_body = QuotationInput,
    responses(
        (status = 201, description = "Quotation created", body = ApiResponse<QuotationDetail>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 500, description = "Nothing was persisted", body = crate::errors::ErrorResponse),
    ),
    tag = "Quotations"
)]
pub async fn create_quotation(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<QuotationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .services
        .quotations
        .create_quotation(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(detail))
}

#[utoipa::path(
    get,
    path = "/quotations/getAll",
    summary = "List quotations",
    responses(
        (status = 200, description = "Visible quotation headers", body = ApiResponse<Vec<quotation::Model>>),
    ),
    tag = "Quotations"
)]
pub async fn list_quotations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let quotations = state
        .services
        .quotations
        .list_quotations()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quotations))
}

#[utoipa::path(
    get,
    path = "/quotations/{id}",
    summary = "Get a quotation with its lines",
    params(("id" = i32, Path, description = "Quotation id")),
    responses(
        (status = 200, description = "Quotation found", body = ApiResponse<QuotationDetail>),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Quotations"
)]
pub async fn get_quotation(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .services
        .quotations
        .get_quotation(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(detail))
}

#[utoipa::path(
    put,
    path = "/quotations/{id}/status",
    summary = "Change quotation status",
    params(("id" = i32, Path, description = "Quotation id")),
    request_body = StatusInput,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<quotation::Model>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Quotations"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<StatusInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .quotations
        .update_status(id, &payload.status, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/quotations/{id}",
    summary = "Soft delete a quotation",
    params(("id" = i32, Path, description = "Quotation id")),
    responses(
        (status = 200, description = "Quotation deleted", body = ApiResponse<String>),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Quotations"
)]
pub async fn delete_quotation(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .quotations
        .delete_quotation(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}
