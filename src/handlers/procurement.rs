use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::procurement::{ProcurementEntry, ProcurementService, RestockOutcome};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    #[validate(length(min = 1))]
    #[schema(example = "V25-001")]
    pub vendor_id: String,
    #[validate(length(min = 1))]
    #[schema(example = "M01")]
    pub material_id: String,
    /// Units received; must be greater than zero
    #[schema(example = 10)]
    pub quantity: i64,
    /// Per-unit purchase cost; becomes the standing master cost
    #[schema(example = 130)]
    pub unit_cost: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub entries: Vec<ProcurementEntry>,
}

/// Restock a material from a vendor; applies last-in pricing to the master
#[utoipa::path(
    post,
    path = "/api/procurement/restock",
    request_body = RestockRequest,
    responses(
        (status = 201, description = "Restock applied", body = crate::ApiResponse<RestockOutcome>),
        (status = 400, description = "Non-positive quantity or negative cost", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown material id", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn restock(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RestockRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RestockOutcome>>), ServiceError> {
    request.validate()?;

    let service = ProcurementService::new(state.store.clone(), state.locks.clone());
    let outcome = service
        .restock(
            &request.vendor_id,
            &request.material_id,
            request.quantity,
            request.unit_cost,
            &user.staff_id,
            state.config.local_now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(outcome))))
}

/// Full procurement history, newest first
#[utoipa::path(
    get,
    path = "/api/procurement/history",
    responses(
        (status = 200, description = "Procurement log", body = crate::ApiResponse<HistoryResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Procurement"
)]
pub async fn history(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<HistoryResponse>>, ServiceError> {
    let service = ProcurementService::new(state.store.clone(), state.locks.clone());
    let entries = service.history().await?;
    Ok(Json(ApiResponse::success(HistoryResponse { entries })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/restock", post(restock))
        .route("/history", get(history))
}
