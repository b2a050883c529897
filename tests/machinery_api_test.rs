mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use serde_json::{json, Value};

async fn post(app: &TestApp, uri: &str, body: Value) -> Value {
    let (status, body) = app.call(Method::POST, uri, Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
    body["data"].clone()
}

/// Category, subcategory and material every pricing row hangs off
async fn seed_process(app: &TestApp) -> (Value, Value, Value) {
    let category = post(
        app,
        "/machinery-master/add",
        json!({ "name": "Turning", "description": "CNC lathes" }),
    )
    .await;
    let subcategory = post(
        app,
        "/machinery-master/sub/add",
        json!({ "category_id": category["id"], "subcategory_name": "Rough turning" }),
    )
    .await;
    let material = post(app, "/materials/add", json!({ "material_name": "EN8" })).await;
    (category, subcategory, material)
}

#[tokio::test]
async fn category_lifecycle() {
    let app = TestApp::new().await;
    let created = post(
        &app,
        "/machinery-master/add",
        json!({ "name": "Milling", "main_category_id": 3, "description": "VMC" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Milling");
    assert_eq!(created["main_category_id"], 3);

    let (status, body) = app
        .call(Method::GET, &format!("/machinery-master/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "VMC");

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/machinery-master/{id}"),
            Some(json!({ "name": "Milling (5 axis)" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Milling (5 axis)");
    assert!(body["data"]["main_category_id"].is_null());
    assert!(body["data"]["description"].is_null());

    let (status, body) = app
        .call(Method::DELETE, &format!("/machinery-master/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Machinery category deleted successfully");

    let (status, body) = app
        .call(Method::GET, &format!("/machinery-master/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (_, list) = app.call(Method::GET, "/machinery-master/getAll", None, None).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_category_name_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/machinery-master/add",
            Some(json!({ "description": "VMC" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn empty_category_name_is_stored_as_given() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/machinery-master/add",
            Some(json!({ "name": "" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["data"]["name"], "");
}

#[tokio::test]
async fn subcategory_list_carries_category_name() {
    let app = TestApp::new().await;
    let (category, subcategory, _) = seed_process(&app).await;

    let (status, body) = app
        .call(Method::GET, "/machinery-master/sub/getAll", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], subcategory["id"]);
    assert_eq!(rows[0]["category_id"], category["id"]);
    assert_eq!(rows[0]["subcategory_name"], "Rough turning");
    assert_eq!(rows[0]["category_name"], "Turning");
}

#[tokio::test]
async fn subcategory_update_and_delete() {
    let app = TestApp::new().await;
    let (category, subcategory, _) = seed_process(&app).await;
    let id = subcategory["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/machinery-master/sub/{id}"),
            Some(json!({
                "category_id": category["id"],
                "subcategory_name": "Finish turning",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subcategory_name"], "Finish turning");

    let (status, body) = app
        .call(Method::DELETE, &format!("/machinery-master/sub/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Subcategory deleted successfully");

    let (_, list) = app
        .call(Method::GET, "/machinery-master/sub/getAll", None, None)
        .await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(
            Method::PUT,
            "/machinery-master/sub/999",
            Some(json!({ "subcategory_name": "Ghost" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pricing_list_joins_material_and_process_names() {
    let app = TestApp::new().await;
    let (_, subcategory, material) = seed_process(&app).await;

    let pricing = post(
        &app,
        "/machinery-master/pricing/add",
        json!({
            "material_id": material["id"],
            "process_id": subcategory["id"],
            "minutes": "15.5",
            "unit": "min",
            "rate": "250.75",
            "is_manual_rate": true,
            "note": "setup included",
        }),
    )
    .await;
    assert_eq!(pricing["is_manual_rate"], true);

    let (status, body) = app
        .call(Method::GET, "/machinery-master/pricing/getAll", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let view = &rows[0];
    assert_eq!(view["id"], pricing["id"]);
    assert_eq!(view["material_name"], "EN8");
    assert_eq!(view["process_name"], "Rough turning");
    assert_eq!(decimal(&view["minutes"]), 15.5);
    assert_eq!(decimal(&view["rate"]), 250.75);
    assert_eq!(view["note"], "setup included");
}

#[tokio::test]
async fn pricing_update_and_delete() {
    let app = TestApp::new().await;
    let (_, subcategory, material) = seed_process(&app).await;
    let pricing = post(
        &app,
        "/machinery-master/pricing/add",
        json!({
            "material_id": material["id"],
            "process_id": subcategory["id"],
            "rate": "100.5",
        }),
    )
    .await;
    let id = pricing["id"].as_i64().unwrap();
    assert_eq!(pricing["is_manual_rate"], false);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/machinery-master/pricing/{id}"),
            Some(json!({
                "material_id": material["id"],
                "process_id": subcategory["id"],
                "rate": "120.25",
                "is_manual_rate": true,
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["rate"]), 120.25);
    assert_eq!(body["data"]["is_manual_rate"], true);

    let (status, body) = app
        .call(
            Method::DELETE,
            &format!("/machinery-master/pricing/{id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pricing deleted successfully");

    let (_, list) = app
        .call(Method::GET, "/machinery-master/pricing/getAll", None, None)
        .await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/machinery-master/pricing/{id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
