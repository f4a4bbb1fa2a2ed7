use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::contracts::{ContractDraft, ContractItem, ContractService, DEFAULT_STATUS};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddContractRequest {
    #[validate(length(min = 1))]
    #[schema(example = "P25-001")]
    pub case_id: String,
    /// Itemized service lines; at least one required
    #[validate(length(min = 1))]
    pub items: Vec<ContractItem>,
    /// Defaults to "draft"
    #[schema(example = "draft")]
    pub contract_status: Option<String>,
}

/// Draft a contract for a case
#[utoipa::path(
    post,
    path = "/api/contracts/add",
    request_body = AddContractRequest,
    responses(
        (status = 201, description = "Contract draft recorded", body = crate::ApiResponse<ContractDraft>),
        (status = 400, description = "Missing case id or empty item list", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Contracts"
)]
pub async fn add_contract(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AddContractRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContractDraft>>), ServiceError> {
    request.validate()?;

    let status = request.contract_status.as_deref().unwrap_or(DEFAULT_STATUS);
    let signed_by = format!("{} ({})", user.name, user.staff_id);

    let service = ContractService::new(state.store.clone());
    let draft = service
        .add(
            &request.case_id,
            &request.items,
            status,
            &signed_by,
            state.config.local_now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(draft))))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/add", post(add_contract))
}
