mod common;

use axum::http::{Method, StatusCode};
use funeral_ops_api::store::Sheet;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn cases_get_sequential_ids_and_list_newest_first() {
    let app = TestApp::new().await;

    let mut ids = Vec::new();
    for informer in ["Chen family", "Lin family", "Wang family"] {
        let response = app
            .as_staff(
                Method::POST,
                "/api/cases/add",
                Some(json!({"informer": informer, "assigned_staff": "S02"})),
            )
            .await;
        let body = response_json(response, StatusCode::CREATED).await;
        ids.push(body["data"]["case_id"].as_str().expect("case id").to_string());
    }
    assert!(ids[0].ends_with("-001"));
    assert!(ids[1].ends_with("-002"));
    assert!(ids[2].ends_with("-003"));

    let response = app.as_staff(Method::GET, "/api/cases", None).await;
    let body = response_json(response, StatusCode::OK).await;
    let cases = body["data"]["cases"].as_array().expect("cases");
    assert_eq!(cases[0]["informer"], "Wang family");
    assert_eq!(cases[2]["informer"], "Chen family");
    assert_eq!(cases[0]["status"], "intake");
}

#[tokio::test]
async fn contract_requires_at_least_one_item() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/contracts/add",
            Some(json!({"case_id": "P25-001", "items": []})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .as_staff(
            Method::POST,
            "/api/contracts/add",
            Some(json!({
                "case_id": "P25-001",
                "items": [{"description": "basic package", "price": 30000}]
            })),
        )
        .await;
    let body = response_json(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["total_fee"], "30000");

    // Signer is recorded as "name (staff_id)"; status defaults to draft.
    let contracts = app.store.snapshot(Sheet::Contracts).await;
    assert_eq!(contracts[1][3], "draft");
    assert_eq!(contracts[1][4], "Bob (S02)");
}

#[tokio::test]
async fn schedule_apply_and_window_listing() {
    let app = TestApp::new().await;

    for date in ["2025-12-01", "2025-12-24", "2026-01-02"] {
        let response = app
            .as_staff(
                Method::POST,
                "/api/schedule/apply",
                Some(json!({"date": date, "shift_type": "off"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .as_staff(
            Method::GET,
            "/api/schedule?start_date=2025-12-01&end_date=2025-12-31",
            None,
        )
        .await;
    let body = response_json(response, StatusCode::OK).await;
    let entries = body["data"].as_array().expect("entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["applied_by"], "S02");

    let response = app
        .as_staff(
            Method::POST,
            "/api/schedule/apply",
            Some(json!({"date": "2025-12-25", "shift_type": "vacation"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reminders_flow_hides_closed_and_computes_ritual_dates() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/reminders/add",
            Some(json!({
                "case_id": "P25-001",
                "remind_on": "2025-04-15",
                "content": "order flowers"
            })),
        )
        .await;
    let body = response_json(response, StatusCode::CREATED).await;
    let reminder_id = body["data"]["reminder_id"].as_str().expect("id").to_string();
    assert!(reminder_id.starts_with('R'));

    let response = app.as_staff(Method::GET, "/api/reminders", None).await;
    let body = response_json(response, StatusCode::OK).await;
    let reminders = body["data"].as_array().expect("reminders");
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0]["category"], "manual");
    assert_eq!(reminders[0]["status"], "pending");

    let response = app
        .as_staff(
            Method::POST,
            "/api/reminders/calculate-date",
            Some(json!({"start_date": "2025-01-01", "kind": "seventh_week"})),
        )
        .await;
    let body = response_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["date"], "2025-02-18");

    let response = app
        .as_staff(
            Method::POST,
            "/api/reminders/calculate-date",
            Some(json!({"start_date": "2024-02-29", "kind": "first_anniversary"})),
        )
        .await;
    let body = response_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["date"], "2025-02-28");

    let response = app
        .as_staff(
            Method::POST,
            "/api/reminders/calculate-date",
            Some(json!({"start_date": "2025-01-01", "kind": "tenth_year"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_amount_must_be_positive() {
    let app = TestApp::new().await;

    let response = app
        .as_staff(
            Method::POST,
            "/api/payments/record",
            Some(json!({
                "case_id": "P25-001",
                "amount": 0,
                "kind": "deposit",
                "method": "cash"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vendors_are_managed_through_the_admin_router() {
    let app = TestApp::new().await;

    let response = app
        .as_admin(
            Method::POST,
            "/api/admin/vendors/add",
            Some(json!({
                "name": "Lotus Flowers",
                "contact": "Ms. Lin",
                "service_type": "florist"
            })),
        )
        .await;
    let body = response_json(response, StatusCode::CREATED).await;
    let vendor_id = body["data"]["vendor_id"].as_str().expect("id");
    assert!(vendor_id.starts_with('V'));

    let response = app.as_admin(Method::GET, "/api/admin/vendors", None).await;
    let body = response_json(response, StatusCode::OK).await;
    let vendors = body["data"]["vendors"].as_array().expect("vendors");
    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0]["name"], "Lotus Flowers");

    let response = app
        .as_staff(
            Method::POST,
            "/api/admin/vendors/add",
            Some(json!({"name": "Stone Works", "contact": "Mr. Wu"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
