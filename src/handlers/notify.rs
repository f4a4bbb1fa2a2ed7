use axum::{extract::State, routing::get, Json, Router};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::notify::{DigestOutcome, NotifyService};
use crate::services::reminders::ReminderService;
use crate::ApiResponse;

/// Push today's pending reminders to the configured webhook
#[utoipa::path(
    get,
    path = "/api/notify/check-today",
    responses(
        (status = 200, description = "Digest outcome", body = crate::ApiResponse<DigestOutcome>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 502, description = "Webhook rejected the push", body = crate::errors::ErrorResponse),
        (status = 503, description = "No webhook URL configured", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notify"
)]
pub async fn check_today(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<DigestOutcome>>, ServiceError> {
    let reminders = ReminderService::new(state.store.clone(), state.locks.clone());
    let service = NotifyService::new(
        reminders,
        state.http.clone(),
        state.config.notify_webhook_url.clone(),
    );

    let today = state.config.local_now().format("%Y-%m-%d").to_string();
    let outcome = service.check_today(&today).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/check-today", get(check_today))
}
