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
use crate::entities::{material, material_type, material_type_link};
use crate::errors::ApiError;
use crate::services::materials::{
    MaterialInput, MaterialLinkInput, MaterialLinkView, MaterialTypeInput,
};
use crate::{ApiResponse, AppState};

/// Material, material type and link routes
pub fn materials_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/type/add", post(create_material_type))
        .route("/type/getAll", get(list_material_types))
        .route(
            "/type/{id}",
            put(update_material_type).delete(delete_material_type),
        )
        .route("/link/add", post(create_link))
        .route("/link/getAll", get(list_links))
        .route("/link/{id}", put(update_link).delete(delete_link))
        .route("/add", post(create_material))
        .route("/getAll", get(list_materials))
        .route(
            "/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
}

// Material types

#[utoipa::path(
    post,
    path = "/materials/type/add",
    summary = "Create a material type",
    request_body = MaterialTypeInput,
    responses(
        (status = 201, description = "Material type created", body = ApiResponse<material_type::Model>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn create_material_type(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<MaterialTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .materials
        .create_material_type(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/materials/type/getAll",
    summary = "List material types",
    responses(
        (status = 200, description = "Visible material types", body = ApiResponse<Vec<material_type::Model>>),
    ),
    tag = "Materials"
)]
pub async fn list_material_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let types = state
        .services
        .materials
        .list_material_types()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(types))
}

#[utoipa::path(
    put,
    path = "/materials/type/{id}",
    summary = "Replace a material type",
    params(("id" = i32, Path, description = "Material type id")),
    request_body = MaterialTypeInput,
    responses(
        (status = 200, description = "Material type updated", body = ApiResponse<material_type::Model>),
        (status = 404, description = "Material type not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn update_material_type(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<MaterialTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .materials
        .update_material_type(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/materials/type/{id}",
    summary = "Soft delete a material type",
    params(("id" = i32, Path, description = "Material type id")),
    responses(
        (status = 200, description = "Material type deleted", body = ApiResponse<String>),
        (status = 404, description = "Material type not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn delete_material_type(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .materials
        .delete_material_type(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}

// Links

#[utoipa::path(
    post,
    path = "/materials/link/add",
    summary = "Link a material to a material type",
    request_body = MaterialLinkInput,
    responses(
        (status = 201, description = "Link created", body = ApiResponse<material_type_link::Model>),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<MaterialLinkInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .materials
        .create_link(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/materials/link/getAll",
    summary = "List links with material and type names",
    responses(
        (status = 200, description = "Visible links", body = ApiResponse<Vec<MaterialLinkView>>),
    ),
    tag = "Materials"
)]
pub async fn list_links(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let links = state
        .services
        .materials
        .list_links()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(links))
}

#[utoipa::path(
    put,
    path = "/materials/link/{id}",
    summary = "Replace a link",
    params(("id" = i32, Path, description = "Link id")),
    request_body = MaterialLinkInput,
    responses(
        (status = 200, description = "Link updated", body = ApiResponse<material_type_link::Model>),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<MaterialLinkInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .materials
        .update_link(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/materials/link/{id}",
    summary = "Soft delete a link",
    params(("id" = i32, Path, description = "Link id")),
    responses(
        (status = 200, description = "Link deleted", body = ApiResponse<String>),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .materials
        .delete_link(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}

// Materials

#[utoipa::path(
    post,
    path = "/materials/add",
    summary = "Create a material",
    request_body = MaterialInput,
    responses(
        (status = 201, description = "Material created", body = ApiResponse<material::Model>),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn create_material(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    ValidJson(payload): ValidJson<MaterialInput>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .services
        .materials
        .create_material(payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(created_response(created))
}

#[utoipa::path(
    get,
    path = "/materials/getAll",
    summary = "List materials",
    responses(
        (status = 200, description = "Visible materials, newest first", body = ApiResponse<Vec<material::Model>>),
    ),
    tag = "Materials"
)]
pub async fn list_materials(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = state
        .services
        .materials
        .list_materials()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(materials))
}

#[utoipa::path(
    get,
    path = "/materials/{id}",
    summary = "Get a material",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material found", body = ApiResponse<material::Model>),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn get_material(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let material = state
        .services
        .materials
        .get_material(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(material))
}

#[utoipa::path(
    put,
    path = "/materials/{id}",
    summary = "Replace a material",
    params(("id" = i32, Path, description = "Material id")),
    request_body = MaterialInput,
    responses(
        (status = 200, description = "Material updated", body = ApiResponse<material::Model>),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn update_material(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
    ValidJson(payload): ValidJson<MaterialInput>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .materials
        .update_material(id, payload, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/materials/{id}",
    summary = "Soft delete a material",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material deleted", body = ApiResponse<String>),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Materials"
)]
pub async fn delete_material(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .services
        .materials
        .delete_material(id, actor.id())
        .await
        .map_err(map_service_error)?;

    Ok(message_response(deleted.0))
}
