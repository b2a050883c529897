use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{map_service_error, ValidJson};
use crate::errors::ApiError;
use crate::services::users::{LoggedInUser, LoginRequest, RegisterRequest, RegisteredUser};
use crate::AppState;

/// Body returned by a successful registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    #[schema(example = "User Registered Successfully!")]
    pub message: String,
    pub user: RegisteredUser,
}

/// Body returned by a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    #[schema(example = "Login Successful!")]
    pub message: String,
    pub token: String,
    pub user: LoggedInUser,
}

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    summary = "Register a user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing fields or duplicate email", body = crate::errors::ErrorResponse),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .register(payload)
        .await
        .map_err(map_service_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User Registered Successfully!".to_string(),
            user,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    summary = "Log in and receive a bearer token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unknown user or wrong credentials", body = crate::errors::ErrorResponse),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .services
        .users
        .login(payload)
        .await
        .map_err(map_service_error)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login Successful!".to_string(),
        token: outcome.token,
        user: outcome.user,
    }))
}
