// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use funeral_ops_api::{
    auth::AuthService,
    config::AppConfig,
    models::StaffRecord,
    services::StoreLocks,
    store::{MemoryStore, Sheet},
    AppState,
};

/// Test harness: the full application router backed by a seeded in-memory
/// store, with pre-issued tokens for an administrator and a regular staff
/// member.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    admin_token: String,
    staff_token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Variant with a reminder digest webhook configured.
    pub async fn with_webhook(url: &str) -> Self {
        Self::build(Some(url.to_string())).await
    }

    async fn build(webhook_url: Option<String>) -> Self {
        let mut cfg = AppConfig::new(
            "test_secret_key_for_testing_purposes_only".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.notify_webhook_url = webhook_url;

        let store = Arc::new(MemoryStore::new());
        seed_workbook(&store).await;

        let auth = Arc::new(AuthService::new(
            &cfg.jwt_secret,
            Duration::from_secs(cfg.jwt_expiration as u64),
        ));

        let admin_token = auth
            .issue_token(&StaffRecord {
                staff_id: "S01".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "alice-pass".to_string(),
                role: "Administrator".to_string(),
                status: "Active".to_string(),
            })
            .expect("issue admin token");
        let staff_token = auth
            .issue_token(&StaffRecord {
                staff_id: "S02".to_string(),
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password: "bob-pass".to_string(),
                role: "Staff".to_string(),
                status: "Active".to_string(),
            })
            .expect("issue staff token");

        let state = AppState {
            store: store.clone(),
            config: cfg,
            auth,
            locks: Arc::new(StoreLocks::new()),
            http: reqwest::Client::new(),
        };

        Self {
            router: funeral_ops_api::app_router(state),
            store,
            admin_token,
            staff_token,
        }
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    pub fn staff_token(&self) -> &str {
        &self.staff_token
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {tok}"));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn as_staff(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let token = self.staff_token.clone();
        self.request(method, uri, body, Some(&token)).await
    }

    pub async fn as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let token = self.admin_token.clone();
        self.request(method, uri, body, Some(&token)).await
    }
}

/// Decode a JSON response body, asserting the expected status first.
pub async fn response_json(response: axum::response::Response, expected: StatusCode) -> Value {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect response body")
        .to_bytes();
    assert_eq!(
        status,
        expected,
        "unexpected status; body: {}",
        String::from_utf8_lossy(&bytes)
    );
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

/// Raw response body as bytes, for byte-level comparisons.
pub async fn response_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect response body")
        .to_bytes()
        .to_vec()
}

/// Seed every tab with its header row plus the staff roster.
async fn seed_workbook(store: &MemoryStore) {
    store
        .seed(
            Sheet::Staff,
            vec![
                vec!["staff_id", "name", "email", "password", "role", "status"],
                vec!["S01", "Alice", "alice@example.com", "alice-pass", "Administrator", "Active"],
                vec!["S02", "Bob", "bob@example.com", "bob-pass", "Staff", "Active"],
                vec!["S03", "Wei", "wei@example.com", "wei-pass", "Staff", "Suspended"],
            ],
        )
        .await;
    store
        .seed(
            Sheet::Cases,
            vec![vec!["case_id", "reported_at", "informer", "assigned_staff", "status"]],
        )
        .await;
    store
        .seed(
            Sheet::Contracts,
            vec![vec!["case_id", "service_summary", "total_fee", "status", "signed_by", "signed_at"]],
        )
        .await;
    store
        .seed(
            Sheet::Schedule,
            vec![vec!["log_id", "staff_id", "date", "shift_type", "applied_by"]],
        )
        .await;
    store
        .seed(
            Sheet::Reminders,
            vec![vec![
                "reminder_id", "case_id", "remind_on", "category", "content", "status", "created_by",
            ]],
        )
        .await;
    store
        .seed(
            Sheet::InventoryLog,
            vec![vec![
                "log_id", "case_id", "material_id", "quantity", "cost_per_unit", "total_cost",
                "recorded_at", "staff_id",
            ]],
        )
        .await;
    store
        .seed(
            Sheet::MaterialMaster,
            vec![
                vec!["material_id", "name", "unit", "current_cost", "current_stock"],
                vec!["M01", "urn", "pc", "1000", "50"],
                vec!["M02", "incense", "box", "300", "200"],
            ],
        )
        .await;
    store
        .seed(
            Sheet::Payments,
            vec![vec![
                "payment_id", "case_id", "amount", "kind", "method", "status", "recorded_at",
                "recorded_by",
            ]],
        )
        .await;
    store
        .seed(
            Sheet::Vendors,
            vec![vec!["vendor_id", "name", "contact", "phone", "service_type"]],
        )
        .await;
    store
        .seed(
            Sheet::Procurement,
            vec![vec![
                "procurement_id", "recorded_at", "vendor_id", "material_id", "quantity",
                "unit_cost", "total_cost", "staff_id",
            ]],
        )
        .await;
}
