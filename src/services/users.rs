use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::{hash_password, verify_password, AuthService, SYSTEM_ACTOR_ID};
use crate::db::DatabaseAccess;
use crate::entities::user;
use crate::errors::ServiceError;

const REGISTRATION_FAILED: &str = "User Registration failed!";
const USER_NOT_FOUND: &str = "User not found!";
const INVALID_CREDENTIALS: &str = "Invalid credentials!";

/// Self-service registration request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
    pub company_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub company_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUser {
    pub id: i32,
    pub user_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoggedInUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: LoggedInUser,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Registration and login against the users table
#[derive(Clone)]
pub struct UserService {
    db: DatabaseAccess,
    auth: Arc<AuthService>,
    default_company_code: String,
}

impl UserService {
    pub fn new(db: DatabaseAccess, auth: Arc<AuthService>, default_company_code: String) -> Self {
        Self {
            db,
            auth,
            default_company_code,
        }
    }

    /// Creates a user with a bcrypt hash; self registration is recorded as the system actor.
    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisteredUser, ServiceError> {
        let (Some(username), Some(email), Some(mobile), Some(password)) = (
            required(request.username),
            required(request.email),
            required(request.mobile),
            required(request.password),
        ) else {
            return Err(ServiceError::ValidationError(
                "All fields are required!".to_string(),
            ));
        };

        let company_code =
            required(request.company_code).unwrap_or_else(|| self.default_company_code.clone());

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))??;

        let model = user::ActiveModel {
            user_name: Set(username),
            email: Set(email),
            mobile_number: Set(Some(mobile)),
            password: Set(password_hash),
            is_active: Set(true),
            company_code: Set(company_code),
            created_by: Set(SYSTEM_ACTOR_ID),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "User registration failed");
            ServiceError::BadRequest(REGISTRATION_FAILED.to_string())
        })?;

        info!(user_id = created.id, "User registered");
        Ok(RegisteredUser {
            id: created.id,
            user_name: created.user_name,
            email: created.email,
        })
    }

    /// Verifies credentials and issues an access token
    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, ServiceError> {
        let (Some(email), Some(password)) = (required(request.email), required(request.password))
        else {
            return Err(ServiceError::ValidationError(
                "Email and password are required!".to_string(),
            ));
        };

        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .filter(user::Column::DeletedAt.is_null())
            .filter(user::Column::IsActive.eq(true))
            .one(self.db.conn())
            .await?
            .ok_or_else(|| {
                warn!("Login for unknown user");
                ServiceError::AuthError(USER_NOT_FOUND.to_string())
            })?;

        if let Some(company_code) = required(request.company_code) {
            if company_code != found.company_code {
                warn!(user_id = found.id, "Login with mismatched company code");
                return Err(ServiceError::AuthError(INVALID_CREDENTIALS.to_string()));
            }
        }

        let stored_hash = found.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))??;

        if !matches {
            warn!(user_id = found.id, "Login with wrong password");
            return Err(ServiceError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.auth.generate_token(found.id, &found.email)?;

        info!(user_id = found.id, "User logged in");
        Ok(LoginOutcome {
            token,
            user: LoggedInUser {
                id: found.id,
                username: found.user_name,
                email: found.email,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_reads_camel_case_company_code() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"u","email":"e@x.io","mobile":"1","password":"p","companyCode":"ABC"}"#,
        )
        .unwrap();
        assert_eq!(request.company_code.as_deref(), Some("ABC"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        assert_eq!(required(Some("  ".into())), None);
        assert_eq!(required(None), None);
        assert_eq!(required(Some("x".into())), Some("x".into()));
    }
}
