/*!
 * # Authentication Module
 *
 * JWT issuance and verification for the quotation API, bcrypt password
 * hashing, and the middleware that resolves the acting user for audit
 * columns.
 *
 * Routes do not require a token. When a bearer token is sent it must be
 * valid; the acting user is then the token's user id, otherwise `0`.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;

pub mod password;

pub use password::{hash_password, verify_password, BCRYPT_COST};

/// Acting user id recorded when a request carries no token
pub const SYSTEM_ACTOR_ID: i32 = 0;

/// Claim structure for JWT tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub id: i32,
    pub email: String,
    pub iat: i64, // Issued at time
    pub exp: i64, // Expiration time
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, access_token_expiration: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_expiration,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            Duration::from_secs(cfg.jwt_expiration),
        )
    }
}

/// Issues and validates access tokens
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Generate a signed HS256 token for a user
    pub fn generate_token(&self, user_id: i32, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.config.access_token_expiration.as_secs())
            .map_err(|_| AuthError::TokenCreation("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            id: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => {
                ServiceError::Unauthorized("Invalid authentication token".to_string())
            }
            AuthError::TokenExpired => ServiceError::Unauthorized("Token has expired".to_string()),
            AuthError::TokenCreation(msg) => ServiceError::JwtError(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

/// Resolves an optional bearer token into an [`AuthUser`] request extension.
///
/// Requests without an `Authorization` header pass through untouched.
pub async fn optional_auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_auth_from_headers(request.headers(), &auth) {
        Ok(Some(user)) => {
            debug!(user_id = user.user_id, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            warn!(error = %e, "Rejected bearer token");
            e.into_response()
        }
    }
}

fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth: &AuthService,
) -> Result<Option<AuthUser>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidToken)?;

    auth.validate_token(token).map(|claims| Some(claims.into()))
}

/// Acting user id for audit columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub i32);

impl Actor {
    pub fn id(&self) -> i32 {
        self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Actor(
            parts
                .extensions
                .get::<AuthUser>()
                .map(|user| user.user_id)
                .unwrap_or(SYSTEM_ACTOR_ID),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(
            "unit_test_jwt_secret_value_that_is_long_enough",
            Duration::from_secs(3600),
        ))
    }

    #[test]
    fn token_round_trip_carries_user_identity() {
        let auth = service();
        let token = auth.generate_token(7, "test@example.com").unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(AuthConfig::new(
            "a_completely_different_secret_of_enough_length",
            Duration::from_secs(3600),
        ));
        let token = other.generate_token(1, "a@example.com").unwrap();
        assert_matches!(service().validate_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".into(),
            id: 1,
            email: "a@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(auth.config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert_matches!(auth.validate_token(&token), Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn signing_failure_is_a_server_error() {
        let response = AuthError::TokenCreation("key rejected".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
    }

    #[test]
    fn rejected_tokens_stay_unauthorized() {
        assert_eq!(
            ServiceError::from(AuthError::InvalidToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::from(AuthError::TokenExpired).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    async fn whoami(actor: Actor) -> String {
        actor.id().to_string()
    }

    fn app() -> Router {
        let auth = Arc::new(service());
        Router::new()
            .route("/", get(whoami))
            .layer(axum::middleware::from_fn_with_state(
                auth,
                optional_auth_middleware,
            ))
    }

    async fn call(authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn anonymous_requests_act_as_system() {
        assert_eq!(call(None).await, (StatusCode::OK, "0".to_string()));
    }

    #[tokio::test]
    async fn bearer_token_sets_actor() {
        let token = service().generate_token(42, "a@example.com").unwrap();
        assert_eq!(
            call(Some(format!("Bearer {token}"))).await,
            (StatusCode::OK, "42".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_authorization_is_unauthorized() {
        let (status, _) = call(Some("Bearer not-a-jwt".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(Some("Basic dXNlcjpwYXNz".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
