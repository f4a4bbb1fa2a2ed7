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
use crate::services::cases::{CaseService, CaseSummary};
use crate::ApiResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct CaseListResponse {
    pub cases: Vec<CaseSummary>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCaseRequest {
    /// Who reported the case (family member, hospital, ...)
    #[validate(length(min = 1))]
    #[schema(example = "Chen family")]
    pub informer: String,
    /// Staff member responsible for the case
    #[validate(length(min = 1))]
    #[schema(example = "S02")]
    pub assigned_staff: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddCaseResponse {
    #[schema(example = "P25-001")]
    pub case_id: String,
}

/// List all cases, newest first
#[utoipa::path(
    get,
    path = "/api/cases",
    responses(
        (status = 200, description = "Case list", body = crate::ApiResponse<CaseListResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cases"
)]
pub async fn list_cases(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<CaseListResponse>>, ServiceError> {
    let service = CaseService::new(state.store.clone(), state.locks.clone());
    let cases = service.list().await?;
    Ok(Json(ApiResponse::success(CaseListResponse { cases })))
}

/// Open a new case (intake)
#[utoipa::path(
    post,
    path = "/api/cases/add",
    request_body = AddCaseRequest,
    responses(
        (status = 201, description = "Case created", body = crate::ApiResponse<AddCaseResponse>),
        (status = 400, description = "Missing informer or staff", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cases"
)]
pub async fn add_case(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddCaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddCaseResponse>>), ServiceError> {
    request.validate()?;

    let service = CaseService::new(state.store.clone(), state.locks.clone());
    let case_id = service
        .create(&request.informer, &request.assigned_staff, state.config.local_now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AddCaseResponse { case_id })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cases))
        .route("/add", post(add_case))
}
