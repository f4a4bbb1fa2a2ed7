use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::staff::StaffDirectory;
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Staff email (matched case-insensitively)
    #[validate(length(min = 1))]
    #[schema(example = "alice@example.com")]
    pub username: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Log in against the staff roster
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = crate::ApiResponse<LoginResponse>),
        (status = 400, description = "Missing username", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unknown user, wrong password or inactive staff", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ServiceError> {
    request.validate()?;

    let directory = StaffDirectory::new(state.store.clone());
    let staff = directory
        .authenticate(&request.username, &request.password)
        .await?;
    let token = state.auth.issue_token(&staff)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: AuthUser {
            staff_id: staff.staff_id,
            name: staff.name,
            role: staff.role,
        },
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
