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
use crate::entities::{machinery_master, machinery_subcategory, process_pricing};
use crate::errors::ApiError;
use crate::services::machinery::{
    MachineryCategoryInput, ProcessPricingInput, ProcessPricingView, SubcategoryInput,
    SubcategoryView,
};
use crate::{ApiResponse, AppState};

/// Machinery category, subcategory and process pricing routes
pub fn machinery_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sub/add", post(create_subcategory))
        .route("/sub/getAll", get(list_subcategories))
        .route(
            "/sub/{id}",
            put(update_subcategory).delete(delete_subcategory),
        )
        .route("/pricing/add", post(create_pricing))
        .route("/pricing/getAll", get(list_pricing))
        .route("/pricing/{id}", put(update_pricing).delete(delete_pricing))
        .route("/add", post(create_category))
        .route("/getAll", get(list_categories))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

// Categories

#[utoipa::path(
    post,
    path = "/machinery-master/add",
    summary = "Create a machinery category",
    request_body = MachineryCategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<machinery_master::Model>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<MachineryCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .machinery
        .create_category(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/machinery-master/getAll",
    summary = "List machinery categories",
    responses(
        (status = 200, description = "Visible categories", body = ApiResponse<Vec<machinery_master::Model>>),
    ),
    tag = "Machinery"
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .machinery
        .list_categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

#[utoipa::path(
    get,
    path = "/machinery-master/{id}",
    summary = "Get a machinery category",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<machinery_master::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .machinery
        .get_category(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(category))
}

#[utoipa::path(
    put,
    path = "/machinery-master/{id}",
    summary = "Replace a machinery category",
    params(("id" = i32, Path, description = "Category id")),
    request_body = MachineryCategoryInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<machinery_master::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<MachineryCategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .machinery
        .update_category(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/machinery-master/{id}",
    summary = "Soft delete a machinery category",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .machinery
        .delete_category(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}

// Subcategories

#[utoipa::path(
    post,
    path = "/machinery-master/sub/add",
    summary = "Create a machinery subcategory",
    request_body = SubcategoryInput,
    responses(
        (status = 201, description = "Subcategory created", body = ApiResponse<machinery_subcategory::Model>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn create_subcategory(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<SubcategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .machinery
        .create_subcategory(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/machinery-master/sub/getAll",
    summary = "List subcategories with their category name",
    responses(
        (status = 200, description = "Visible subcategories", body = ApiResponse<Vec<SubcategoryView>>),
    ),
    tag = "Machinery"
)]
pub async fn list_subcategories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let subcategories = state
        .services
        .machinery
        .list_subcategories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(subcategories))
}

#[utoipa::path(
    put,
    path = "/machinery-master/sub/{id}",
    summary = "Replace a subcategory",
    params(("id" = i32, Path, description = "Subcategory id")),
    request_body = SubcategoryInput,
    responses(
        (status = 200, description = "Subcategory updated", body = ApiResponse<machinery_subcategory::Model>),
        (status = 404, description = "Subcategory not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn update_subcategory(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<SubcategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .machinery
        .update_subcategory(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/machinery-master/sub/{id}",
    summary = "Soft delete a subcategory",
    params(("id" = i32, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Subcategory deleted", body = ApiResponse<String>),
        (status = 404, description = "Subcategory not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn delete_subcategory(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .machinery
        .delete_subcategory(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}

// Process pricing

#[utoipa::path(
    post,
    path = "/machinery-master/pricing/add",
    summary = "Create a process pricing row",
    request_body = ProcessPricingInput,
    responses(
        (status = 201, description = "Pricing created", body = ApiResponse<process_pricing::Model>),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn create_pricing(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<ProcessPricingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .machinery
        .create_pricing(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/machinery-master/pricing/getAll",
    summary = "List process pricing with material and process names",
    responses(
        (status = 200, description = "Visible pricing rows", body = ApiResponse<Vec<ProcessPricingView>>),
    ),
    tag = "Machinery"
)]
pub async fn list_pricing(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let pricing = state
        .services
        .machinery
        .list_pricing()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(pricing))
}

#[utoipa::path(
    put,
    path = "/machinery-master/pricing/{id}",
    summary = "Replace a process pricing row",
    params(("id" = i32, Path, description = "Pricing id")),
    request_body = ProcessPricingInput,
    responses(
        (status = 200, description = "Pricing updated", body = ApiResponse<process_pricing::Model>),
        (status = 404, description = "Pricing not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn update_pricing(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<ProcessPricingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .machinery
        .update_pricing(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/machinery-master/pricing/{id}",
    summary = "Soft delete a process pricing row",
    params(("id" = i32, Path, description = "Pricing id")),
    responses(
        (status = 200, description = "Pricing deleted", body = ApiResponse<String>),
        (status = 404, description = "Pricing not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Machinery"
)]
pub async fn delete_pricing(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .machinery
        .delete_pricing(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}
