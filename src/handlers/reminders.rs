use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::reminders::{ritual_date, Reminder, ReminderService, RitualKind};
use crate::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReminderFilter {
    /// Restrict to one case
    pub case_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddReminderRequest {
    #[validate(length(min = 1))]
    #[schema(example = "P25-001")]
    pub case_id: String,
    /// Date the reminder falls due (YYYY-MM-DD)
    #[validate(length(min = 1))]
    #[schema(example = "2025-04-15")]
    pub remind_on: String,
    /// Defaults to "manual"
    #[schema(example = "ritual")]
    pub category: Option<String>,
    #[validate(length(min = 1))]
    #[schema(example = "confirm flower order with vendor")]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddReminderResponse {
    #[schema(example = "R25-001")]
    pub reminder_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CalculateDateRequest {
    /// Date of passing (YYYY-MM-DD); counts as day 1
    #[schema(example = "2025-01-01")]
    pub start_date: String,
    /// seventh_week | hundredth_day | first_anniversary | third_anniversary
    #[schema(example = "seventh_week")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalculateDateResponse {
    #[schema(example = "2025-02-18")]
    pub date: String,
    #[schema(example = "seventh week (day 49)")]
    pub label: String,
}

/// Open reminders, optionally for one case
#[utoipa::path(
    get,
    path = "/api/reminders",
    params(ReminderFilter),
    responses(
        (status = 200, description = "Open reminders", body = crate::ApiResponse<Vec<Reminder>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reminders"
)]
pub async fn list_reminders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<ReminderFilter>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, ServiceError> {
    let service = ReminderService::new(state.store.clone(), state.locks.clone());
    let reminders = service.list(filter.case_id.as_deref()).await?;
    Ok(Json(ApiResponse::success(reminders)))
}

/// Record a reminder for a case
#[utoipa::path(
    post,
    path = "/api/reminders/add",
    request_body = AddReminderRequest,
    responses(
        (status = 201, description = "Reminder recorded", body = crate::ApiResponse<AddReminderResponse>),
        (status = 400, description = "Missing case id, date or content", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reminders"
)]
pub async fn add_reminder(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AddReminderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddReminderResponse>>), ServiceError> {
    request.validate()?;

    let service = ReminderService::new(state.store.clone(), state.locks.clone());
    let reminder_id = service
        .add(
            &request.case_id,
            &request.remind_on,
            request.category.as_deref(),
            &request.content,
            &user.staff_id,
            state.config.local_now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AddReminderResponse { reminder_id })),
    ))
}

/// Compute a traditional observance date from the date of passing
#[utoipa::path(
    post,
    path = "/api/reminders/calculate-date",
    request_body = CalculateDateRequest,
    responses(
        (status = 200, description = "Computed observance date", body = crate::ApiResponse<CalculateDateResponse>),
        (status = 400, description = "Unparseable date or unknown ritual", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reminders"
)]
pub async fn calculate_date(
    _user: AuthUser,
    Json(request): Json<CalculateDateRequest>,
) -> Result<Json<ApiResponse<CalculateDateResponse>>, ServiceError> {
    let start = NaiveDate::parse_from_str(&request.start_date, "%Y-%m-%d").map_err(|_| {
        ServiceError::ValidationError(format!(
            "start_date must be YYYY-MM-DD, got {:?}",
            request.start_date
        ))
    })?;
    let kind: RitualKind = request.kind.parse()?;
    let date = ritual_date(start, kind);

    Ok(Json(ApiResponse::success(CalculateDateResponse {
        date: date.format("%Y-%m-%d").to_string(),
        label: kind.label().to_string(),
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders))
        .route("/add", post(add_reminder))
        .route("/calculate-date", post(calculate_date))
}
