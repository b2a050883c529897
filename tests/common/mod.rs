use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use quotation_api::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    AppState,
};
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, Statement};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "Password@123";

/// Helper harness for spinning up the application over an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Construct a new test application with a fresh schema.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_081,
            "test".to_string(),
        );
        // In-memory SQLite is per connection; a single connection keeps one database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_with_config(&DbConfig::from(&cfg))
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = Arc::new(AppState::new(Arc::new(pool), cfg));
        let router = app_router(state.clone());

        Self { router, state }
    }

    #[allow(dead_code)]
    pub fn pool(&self) -> &DbPool {
        self.state.db.conn()
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and decodes the JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body, token).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Registers the well-known test user and returns its id.
    #[allow(dead_code)]
    pub async fn seed_user(&self) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                Some(json!({
                    "username": "Test User",
                    "email": TEST_EMAIL,
                    "mobile": "1234567890",
                    "password": TEST_PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed user failed: {body}");
        body["user"]["id"].as_i64().expect("registered user id")
    }

    /// Logs the test user in and returns the bearer token.
    #[allow(dead_code)]
    pub async fn login_token(&self) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/login",
                Some(json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Runs a raw statement against the test database.
    #[allow(dead_code)]
    pub async fn execute(&self, sql: &str) {
        self.pool()
            .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .expect("raw statement failed");
    }

    /// Counts rows with a raw query, ignoring soft deletion.
    #[allow(dead_code)]
    pub async fn count(&self, sql: &str) -> i64 {
        let row = self
            .pool()
            .query_one(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .expect("count query failed")
            .expect("count query returned no row");
        row.try_get_by_index::<i64>(0).expect("count column")
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not json")
    }
}

/// Reads a decimal that the API serializes as a JSON string.
#[allow(dead_code)]
pub fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(raw) => raw.parse().expect("decimal string"),
        other => other.as_f64().expect("decimal value"),
    }
}
