use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::schedule::{ScheduleEntry, ScheduleService, ShiftType};
use crate::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleWindow {
    /// Inclusive window start (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive window end (YYYY-MM-DD)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyShiftRequest {
    /// Date being applied for (YYYY-MM-DD)
    #[validate(length(min = 1))]
    #[schema(example = "2025-12-24")]
    pub date: String,
    /// off | duty | standby | annual_leave
    #[schema(example = "off")]
    pub shift_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplyShiftResponse {
    #[schema(example = "L25-001")]
    pub log_id: String,
}

/// Schedule log, optionally filtered by date window
#[utoipa::path(
    get,
    path = "/api/schedule",
    params(ScheduleWindow),
    responses(
        (status = 200, description = "Schedule entries", body = crate::ApiResponse<Vec<ScheduleEntry>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn list_schedule(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(window): Query<ScheduleWindow>,
) -> Result<Json<ApiResponse<Vec<ScheduleEntry>>>, ServiceError> {
    let service = ScheduleService::new(state.store.clone(), state.locks.clone());
    let entries = service
        .list(window.start_date.as_deref(), window.end_date.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Apply for a shift or leave; the caller is recorded as applier
#[utoipa::path(
    post,
    path = "/api/schedule/apply",
    request_body = ApplyShiftRequest,
    responses(
        (status = 201, description = "Application recorded", body = crate::ApiResponse<ApplyShiftResponse>),
        (status = 400, description = "Missing date or invalid shift type", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn apply_shift(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ApplyShiftRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ApplyShiftResponse>>), ServiceError> {
    request.validate()?;
    let shift_type: ShiftType = request.shift_type.parse()?;

    let service = ScheduleService::new(state.store.clone(), state.locks.clone());
    let log_id = service
        .apply(&user.staff_id, &request.date, shift_type, state.config.local_now())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ApplyShiftResponse { log_id })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedule))
        .route("/apply", post(apply_shift))
}
