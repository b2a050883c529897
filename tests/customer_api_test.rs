mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

async fn create_customer(app: &TestApp, name: &str, abbr: &str) -> Value {
    let (status, body) = app
        .call(
            Method::POST,
            "/customer_registration/create",
            Some(json!({
                "customer_name": name,
                "customer_abbr": abbr,
                "contact_person": "R. Iyer",
                "email": "buyer@example.com",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"][0].clone()
}

#[tokio::test]
async fn single_customer_create_returns_one_element_array() {
    let app = TestApp::new().await;

    let created = create_customer(&app, "Acme Forge", "ACME").await;

    assert_eq!(created["customer_name"], "Acme Forge");
    assert_eq!(created["customer_abbr"], "ACME");
    assert_eq!(created["customer_id"], created["id"]);
    assert_eq!(created["is_active"], true);
    assert_eq!(created["created_by"], 0);
}

#[tokio::test]
async fn bulk_create_reports_each_element_and_keeps_successes() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/customer_registration/create",
            Some(json!([
                { "customer_name": "Acme Forge", "customer_abbr": "ACME" },
                { "customer_name": "Acme Duplicate", "customer_abbr": "ACME" },
                { "customer_name": "Bharat Castings", "customer_abbr": "BHCS" },
            ])),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let results = body["data"].as_array().expect("array of results");
    assert_eq!(results.len(), 3);

    let failures: Vec<&Value> = results.iter().filter(|r| r.get("error").is_some()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["customer_abbr"], "ACME");
    assert_eq!(failures[0]["customer_name"], "Acme Duplicate");
    assert!(!failures[0]["error"].as_str().unwrap().is_empty());

    let successes = results.iter().filter(|r| r.get("id").is_some()).count();
    assert_eq!(successes, 2);

    assert_eq!(app.count("SELECT COUNT(*) FROM customers").await, 2);
}

#[tokio::test]
async fn malformed_element_fails_alone_in_a_batch() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/customer_registration/create",
            Some(json!([
                { "customer_name": "Acme Forge", "customer_abbr": "AAA" },
                { "customer_name": "Bharat Castings" },
                { "customer_name": "Chola Gears", "customer_abbr": "CCC" },
            ])),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "bulk create failed: {body}");
    let results = body["data"].as_array().expect("array of results");
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["customer_abbr"], "AAA");
    assert!(results[0].get("id").is_some());

    assert!(results[1].get("id").is_none());
    assert_eq!(results[1]["customer_name"], "Bharat Castings");
    assert!(results[1]["error"]
        .as_str()
        .unwrap()
        .contains("customer_abbr"));

    assert_eq!(results[2]["customer_abbr"], "CCC");
    assert!(results[2].get("id").is_some());

    assert_eq!(app.count("SELECT COUNT(*) FROM customers").await, 2);
}

#[tokio::test]
async fn get_customer_is_idempotent() {
    let app = TestApp::new().await;
    let created = create_customer(&app, "Acme Forge", "ACME").await;
    let uri = format!(
        "/customer_registration/getcustomerbyId/{}",
        created["id"].as_i64().unwrap()
    );

    let (first_status, first) = app.call(Method::GET, &uri, None, None).await;
    let (second_status, second) = app.call(Method::GET, &uri, None, None).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["data"], second["data"]);
    assert_eq!(first["data"]["customer_abbr"], "ACME");
}

#[tokio::test]
async fn missing_customer_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::GET, "/customer_registration/getcustomerbyId/999", None, None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Customer not found");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(Method::GET, "/customer_registration/getcustomerbyId/abc", None, None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new().await;
    create_customer(&app, "Acme Forge", "ACME").await;
    create_customer(&app, "Bharat Castings", "BHCS").await;

    let (status, body) = app
        .call(Method::GET, "/customer_registration/customers", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let abbrs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["customer_abbr"].as_str().unwrap())
        .collect();
    assert_eq!(abbrs, vec!["BHCS", "ACME"]);
}

#[tokio::test]
async fn soft_deleted_customer_disappears_but_row_remains() {
    let app = TestApp::new().await;
    let created = create_customer(&app, "Acme Forge", "ACME").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .call(Method::DELETE, &format!("/customer_registration/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/customer_registration/getcustomerbyId/{id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app
        .call(Method::GET, "/customer_registration/customers", None, None)
        .await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let remaining = app
        .count(&format!(
            "SELECT COUNT(*) FROM customers WHERE id = {id} AND deleted_at IS NOT NULL AND deleted_by = 0"
        ))
        .await;
    assert_eq!(remaining, 1);

    let (status, _) = app
        .call(Method::DELETE, &format!("/customer_registration/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let app = TestApp::new().await;
    let created = create_customer(&app, "Acme Forge", "ACME").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/customer_registration/update/{id}"),
            Some(json!({
                "customer_name": "Acme Forgings",
                "customer_abbr": "ACMF",
                "is_active": false,
            })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer_name"], "Acme Forgings");
    assert_eq!(body["data"]["customer_abbr"], "ACMF");
    assert_eq!(body["data"]["is_active"], false);
    assert!(body["data"]["contact_person"].is_null());
    assert!(body["data"]["email"].is_null());
    assert_eq!(body["data"]["updated_by"], 0);
}

#[tokio::test]
async fn update_of_missing_customer_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(
            Method::PUT,
            "/customer_registration/update/404",
            Some(json!({ "customer_name": "Ghost", "customer_abbr": "GHST" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn abbreviation_longer_than_six_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/customer_registration/update/1",
            Some(json!({ "customer_name": "Acme", "customer_abbr": "TOOLONG" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn enable_disable_and_terms() {
    let app = TestApp::new().await;
    let created = create_customer(&app, "Acme Forge", "ACME").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/customer_registration/{id}/disable"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/customer_registration/{id}/enable"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], true);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/customer_registration/{id}/saveTerms"),
            Some(json!({ "terms": "50% advance, balance before dispatch" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["terms"], "50% advance, balance before dispatch");
    assert_eq!(body["data"]["customer_name"], "Acme Forge");

    let (status, _) = app
        .call(Method::PUT, "/customer_registration/999/disable", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
