mod common;

use axum::http::{Method, StatusCode};
use funeral_ops_api::store::Sheet;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn restock_applies_last_in_pricing_to_the_master() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/procurement/restock",
            Some(json!({
                "vendor_id": "V25-001",
                "material_id": "M01",
                "quantity": 10,
                "unit_cost": 1300
            })),
        )
        .await;
    let body = response_json(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["new_stock"], "60");
    assert_eq!(body["data"]["new_cost"], "1300");
    let procurement_id = body["data"]["procurement_id"].as_str().expect("id");
    assert!(procurement_id.starts_with("PR"));
    assert!(procurement_id.ends_with("-001"));

    let master = app.store.snapshot(Sheet::MaterialMaster).await;
    assert_eq!(master[1][3], "1300");
    assert_eq!(master[1][4], "60");

    let log = app.store.snapshot(Sheet::Procurement).await;
    assert_eq!(log[1][6], "13000");
}

#[tokio::test]
async fn invalid_restock_inputs_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/procurement/restock",
            Some(json!({
                "vendor_id": "V25-001",
                "material_id": "M01",
                "quantity": 0,
                "unit_cost": 100
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .as_staff(
            Method::POST,
            "/api/procurement/restock",
            Some(json!({
                "vendor_id": "V25-001",
                "material_id": "M01",
                "quantity": 5,
                "unit_cost": -1
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_material_fails_after_the_log_write() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/procurement/restock",
            Some(json!({
                "vendor_id": "V25-001",
                "material_id": "M99",
                "quantity": 5,
                "unit_cost": 10
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Write order preserved: the log row stays behind.
    assert_eq!(app.store.snapshot(Sheet::Procurement).await.len(), 2);
}

#[tokio::test]
async fn history_lists_newest_first() {
    let app = TestApp::new().await;

    for (qty, cost) in [(1, 1000), (2, 1100)] {
        let response = app
            .as_staff(
                Method::POST,
                "/api/procurement/restock",
                Some(json!({
                    "vendor_id": "V25-001",
                    "material_id": "M01",
                    "quantity": qty,
                    "unit_cost": cost
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.as_staff(Method::GET, "/api/procurement/history", None).await;
    let body = response_json(response, StatusCode::OK).await;
    let entries = body["data"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["unit_cost"], "1100");
    assert_eq!(entries[1]["unit_cost"], "1000");
}
