mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use serde_json::{json, Value};

async fn post(app: &TestApp, uri: &str, body: Value) -> Value {
    let (status, body) = app.call(Method::POST, uri, Some(body), None).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn update_overwrites_omitted_fields_with_null() {
    let app = TestApp::new().await;
    let created = post(
        &app,
        "/materials/add",
        json!({
            "material_name": "EN8",
            "material_grade": "080M40",
            "density": "7.85",
            "unit": "kg",
            "current_price": "82.50",
            "remark": "bright bar",
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(decimal(&created["current_price"]), 82.5);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/materials/{id}"),
            Some(json!({ "material_name": "X" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(Method::GET, &format!("/materials/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let material = &body["data"];
    assert_eq!(material["material_name"], "X");
    assert!(material["material_grade"].is_null());
    assert!(material["density"].is_null());
    assert!(material["unit"].is_null());
    assert!(material["current_price"].is_null());
    assert!(material["remark"].is_null());
}

#[tokio::test]
async fn soft_deleted_material_is_hidden_from_reads() {
    let app = TestApp::new().await;
    let keep = post(&app, "/materials/add", json!({ "material_name": "EN8" })).await;
    let gone = post(&app, "/materials/add", json!({ "material_name": "SS304" })).await;
    let gone_id = gone["id"].as_i64().unwrap();

    let (status, body) = app
        .call(Method::DELETE, &format!("/materials/{gone_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Material deleted successfully");

    let (status, _) = app
        .call(Method::GET, &format!("/materials/{gone_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.call(Method::GET, "/materials/getAll", None, None).await;
    let ids: Vec<i64> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep["id"].as_i64().unwrap()]);

    assert_eq!(
        app.count(&format!("SELECT COUNT(*) FROM materials WHERE id = {gone_id}"))
            .await,
        1
    );
}

#[tokio::test]
async fn missing_material_name_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/materials/add",
            Some(json!({ "material_grade": "EN8" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("material_name"));
}

#[tokio::test]
async fn empty_material_name_is_stored_as_given() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/materials/add",
            Some(json!({ "material_name": "" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["data"]["material_name"], "");
}

#[tokio::test]
async fn material_type_lifecycle() {
    let app = TestApp::new().await;
    let created = post(
        &app,
        "/materials/type/add",
        json!({ "type_name": "Round bar", "description": "Hot rolled" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/materials/type/{id}"),
            Some(json!({ "type_name": "Round bar (bright)" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type_name"], "Round bar (bright)");
    assert!(body["data"]["description"].is_null());

    let (status, body) = app
        .call(Method::DELETE, &format!("/materials/type/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Material Type deleted successfully");

    let (_, list) = app.call(Method::GET, "/materials/type/getAll", None, None).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(Method::DELETE, &format!("/materials/type/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn link_list_joins_material_and_type_names() {
    let app = TestApp::new().await;
    let material = post(
        &app,
        "/materials/add",
        json!({ "material_name": "EN8", "unit": "kg" }),
    )
    .await;
    let material_type = post(&app, "/materials/type/add", json!({ "type_name": "Hex bar" })).await;

    let link = post(
        &app,
        "/materials/link/add",
        json!({
            "material_id": material["id"],
            "material_type_id": material_type["id"],
            "current_price": "91.00",
            "remark": "per kg",
        }),
    )
    .await;

    let (status, body) = app.call(Method::GET, "/materials/link/getAll", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    let view = &links[0];
    assert_eq!(view["id"], link["id"]);
    assert_eq!(view["material_id"], material["id"]);
    assert_eq!(view["material_type_id"], material_type["id"]);
    assert_eq!(view["material_name"], "EN8");
    assert_eq!(view["type_name"], "Hex bar");
    assert_eq!(view["unit"], "kg");
    assert_eq!(decimal(&view["current_price"]), 91.0);
    assert_eq!(view["remark"], "per kg");
}

#[tokio::test]
async fn link_update_and_delete() {
    let app = TestApp::new().await;
    let material = post(&app, "/materials/add", json!({ "material_name": "EN8" })).await;
    let material_type = post(&app, "/materials/type/add", json!({ "type_name": "Plate" })).await;
    let link = post(
        &app,
        "/materials/link/add",
        json!({
            "material_id": material["id"],
            "material_type_id": material_type["id"],
            "current_price": "10.00",
        }),
    )
    .await;
    let id = link["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/materials/link/{id}"),
            Some(json!({
                "material_id": material["id"],
                "material_type_id": material_type["id"],
                "current_price": "12.25",
            })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["current_price"]), 12.25);

    let (status, body) = app
        .call(Method::DELETE, &format!("/materials/link/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Link deleted successfully");

    let (_, list) = app.call(Method::GET, "/materials/link/getAll", None, None).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(
            Method::PUT,
            "/materials/link/999",
            Some(json!({ "current_price": "1.00" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
