use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::report::{CaseFinancials, ReportService};
use crate::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Case-insensitive substring match on the case id
    pub case_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub cases: Vec<CaseFinancials>,
}

/// Financial snapshot of every case, newest first
#[utoipa::path(
    get,
    path = "/api/report/cases",
    responses(
        (status = 200, description = "Aggregated case financials", body = crate::ApiResponse<ReportResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "A source tab could not be read", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn all_cases(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<ReportResponse>>, ServiceError> {
    let service = ReportService::new(state.store.clone());
    let cases = service.all_cases().await?;
    Ok(Json(ApiResponse::success(ReportResponse { cases })))
}

/// Financial snapshot filtered by case id substring
#[utoipa::path(
    get,
    path = "/api/report/query",
    params(ReportQuery),
    responses(
        (status = 200, description = "Matching case financials", body = crate::ApiResponse<ReportResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "No case matched", body = crate::errors::ErrorResponse),
        (status = 500, description = "A source tab could not be read", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn query(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ReportQuery>,
) -> Result<Json<ApiResponse<ReportResponse>>, ServiceError> {
    let service = ReportService::new(state.store.clone());
    let cases = service.query(params.case_id.as_deref()).await?;
    Ok(Json(ApiResponse::success(ReportResponse { cases })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cases", get(all_cases))
        .route("/query", get(query))
}
