use axum::{
    extract::{Json, Path, State},
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
use crate::services::payments::{PaymentEntry, PaymentService};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1))]
    #[schema(example = "P25-001")]
    pub case_id: String,
    /// Must be positive
    #[schema(example = 20000)]
    pub amount: Decimal,
    /// deposit | balance | refund_offset | ...
    #[schema(example = "deposit")]
    pub kind: String,
    #[schema(example = "bank_transfer")]
    pub method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordPaymentResponse {
    #[schema(example = "PYL25-001")]
    pub payment_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CasePaymentsResponse {
    pub case_id: String,
    pub payments: Vec<PaymentEntry>,
    /// Sum of the listed amounts
    #[schema(example = "42000")]
    pub total: Decimal,
}

/// Record a collected payment against a case
#[utoipa::path(
    post,
    path = "/api/payments/record",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = crate::ApiResponse<RecordPaymentResponse>),
        (status = 400, description = "Missing case id or non-positive amount", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecordPaymentResponse>>), ServiceError> {
    request.validate()?;

    let service = PaymentService::new(state.store.clone(), state.locks.clone());
    let payment_id = service
        .record(
            &request.case_id,
            request.amount,
            &request.kind,
            &request.method,
            &user.staff_id,
            state.config.local_now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RecordPaymentResponse { payment_id })),
    ))
}

/// Ledger rows for one case, in write order, with the running total
#[utoipa::path(
    get,
    path = "/api/payments/case/{case_id}",
    params(("case_id" = String, Path, description = "Case id, e.g. P25-001")),
    responses(
        (status = 200, description = "Payments for the case", body = crate::ApiResponse<CasePaymentsResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn case_payments(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(case_id): Path<String>,
) -> Result<Json<ApiResponse<CasePaymentsResponse>>, ServiceError> {
    let service = PaymentService::new(state.store.clone(), state.locks.clone());
    let payments = service.list_for_case(&case_id).await?;
    let total = payments.iter().map(|p| p.amount).sum();

    Ok(Json(ApiResponse::success(CasePaymentsResponse {
        case_id,
        payments,
        total,
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/record", post(record_payment))
        .route("/case/:case_id", get(case_payments))
}
