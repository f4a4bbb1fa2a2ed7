use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::models::Material;
use crate::services::inventory::{ConsumeItem, ConsumeOutcome, InventoryService};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConsumeRequest {
    #[validate(length(min = 1))]
    #[schema(example = "P25-001")]
    pub case_id: String,
    /// Materials consumed for the case; at least one line
    #[validate(length(min = 1))]
    pub items: Vec<ConsumeItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MasterListResponse {
    pub materials: Vec<Material>,
}

/// Current material master (id, name, unit, cost, stock)
#[utoipa::path(
    get,
    path = "/api/inventory/master",
    responses(
        (status = 200, description = "Material master", body = crate::ApiResponse<MasterListResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn master_list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<MasterListResponse>>, ServiceError> {
    let service = InventoryService::new(state.store.clone(), state.locks.clone());
    let materials = service.master_list().await?;
    Ok(Json(ApiResponse::success(MasterListResponse { materials })))
}

/// Record material consumption for a case; unit cost is locked from the
/// master at write time
#[utoipa::path(
    post,
    path = "/api/inventory/consume",
    request_body = ConsumeRequest,
    responses(
        (status = 201, description = "Consumption logged", body = crate::ApiResponse<ConsumeOutcome>),
        (status = 400, description = "Missing case id or empty item list", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown material id", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn consume(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ConsumeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConsumeOutcome>>), ServiceError> {
    request.validate()?;

    let service = InventoryService::new(state.store.clone(), state.locks.clone());
    let outcome = service
        .consume(&request.case_id, &request.items, &user.staff_id, state.config.local_now())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(outcome))))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/master", get(master_list))
        .route("/consume", post(consume))
}
