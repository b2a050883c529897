mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, TEST_EMAIL, TEST_PASSWORD};
use quotation_api::auth::verify_password;
use quotation_api::config::DEFAULT_COMPANY_CODE;
use quotation_api::entities::user;
use sea_orm::EntityTrait;
use serde_json::json;

#[tokio::test]
async fn register_returns_created_user_without_password() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "username": "Asha",
                "email": "asha@example.com",
                "mobile": "9876543210",
                "password": "s3cret!",
                "companyCode": "ACM001",
            })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User Registered Successfully!");
    assert_eq!(body["user"]["user_name"], "Asha");
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert!(body["user"].get("password").is_none());

    let stored = app
        .count(
            "SELECT COUNT(*) FROM users \
             WHERE email = 'asha@example.com' AND company_code = 'ACM001' AND created_by = 0",
        )
        .await;
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn register_stores_bcrypt_hash_and_default_company() {
    let app = TestApp::new().await;
    let id = app.seed_user().await;

    let stored = user::Entity::find_by_id(id as i32)
        .one(app.pool())
        .await
        .unwrap()
        .expect("registered user row");

    assert!(stored.password.starts_with("$2b$10$"));
    assert!(verify_password(TEST_PASSWORD, &stored.password).unwrap());
    assert_eq!(stored.company_code, DEFAULT_COMPANY_CODE);
    assert!(stored.is_active);
}

#[tokio::test]
async fn register_requires_every_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "username": "Asha", "email": "asha@example.com", "password": "x" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "All fields are required!");
}

#[tokio::test]
async fn duplicate_email_fails_registration() {
    let app = TestApp::new().await;
    app.seed_user().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "username": "Someone Else",
                "email": TEST_EMAIL,
                "mobile": "555",
                "password": "another",
            })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User Registration failed!");
}

#[tokio::test]
async fn login_with_seeded_user_returns_token_and_user() {
    let app = TestApp::new().await;
    let id = app.seed_user().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login Successful!");
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["username"], "Test User");
    assert_eq!(body["user"]["email"], TEST_EMAIL);

    let token = body["token"].as_str().expect("token string");
    let claims = app.state.auth.validate_token(token).expect("valid token");
    assert_eq!(claims.id, id as i32);
    assert_eq!(claims.sub, id.to_string());
    assert_eq!(claims.email, TEST_EMAIL);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.seed_user().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": TEST_EMAIL, "password": "wrong" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials!");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn login_for_unknown_email_reports_user_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found!");
}

#[tokio::test]
async fn login_rejects_mismatched_company_code() {
    let app = TestApp::new().await;
    app.seed_user().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": TEST_EMAIL,
                "password": TEST_PASSWORD,
                "companyCode": "OTHER1",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials!");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({
                "email": TEST_EMAIL,
                "password": TEST_PASSWORD,
                "companyCode": DEFAULT_COMPANY_CODE,
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn inactive_user_cannot_log_in() {
    let app = TestApp::new().await;
    app.seed_user().await;
    app.execute("UPDATE users SET is_active = 0").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found!");
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": TEST_EMAIL })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required!");
}

#[tokio::test]
async fn bearer_token_identifies_the_acting_user() {
    let app = TestApp::new().await;
    let id = app.seed_user().await;
    let token = app.login_token().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/materials/add",
            Some(json!({ "material_name": "EN8" })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created_by"], id);

    let (status, body) = app
        .call(
            Method::POST,
            "/materials/add",
            Some(json!({ "material_name": "EN19" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created_by"], 0);
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::GET, "/materials/getAll", None, Some("not-a-jwt"))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}
