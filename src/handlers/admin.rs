//! Administrator-only routes. The whole router is gated behind the
//! `require_admin` middleware layered in `app_router`.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::models::Material;
use crate::services::inventory::InventoryService;
use crate::services::vendors::{Vendor, VendorService};
use crate::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1))]
    #[schema(example = "M01")]
    pub material_id: String,
    /// Fields left out keep their current value
    #[schema(example = "ceramic urn")]
    pub name: Option<String>,
    #[schema(example = "pc")]
    pub unit: Option<String>,
    #[schema(example = 120)]
    pub current_cost: Option<Decimal>,
    #[schema(example = 50)]
    pub current_stock: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddVendorRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Lotus Flowers")]
    pub name: String,
    #[validate(length(min = 1))]
    #[schema(example = "Ms. Lin")]
    pub contact: String,
    #[schema(example = "02-1234-5678")]
    pub phone: Option<String>,
    #[schema(example = "florist")]
    pub service_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddVendorResponse {
    #[schema(example = "V25-001")]
    pub vendor_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorListResponse {
    pub vendors: Vec<Vendor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminMasterResponse {
    pub materials: Vec<Material>,
}

/// Material master, admin view
#[utoipa::path(
    get,
    path = "/api/admin/inventory/master",
    responses(
        (status = 200, description = "Material master", body = crate::ApiResponse<AdminMasterResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn inventory_master(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<AdminMasterResponse>>, ServiceError> {
    let service = InventoryService::new(state.store.clone(), state.locks.clone());
    let materials = service.master_list().await?;
    Ok(Json(ApiResponse::success(AdminMasterResponse { materials })))
}

/// Edit one master row in place; unspecified fields are preserved
#[utoipa::path(
    put,
    path = "/api/admin/inventory/update",
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Master row updated", body = crate::ApiResponse<Material>),
        (status = 400, description = "Missing material id", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown material id", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_material(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<UpdateMaterialRequest>,
) -> Result<Json<ApiResponse<Material>>, ServiceError> {
    request.validate()?;

    let service = InventoryService::new(state.store.clone(), state.locks.clone());
    let updated = service
        .update_master(
            &request.material_id,
            request.name.as_deref(),
            request.unit.as_deref(),
            request.current_cost,
            request.current_stock,
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// Vendor roster
#[utoipa::path(
    get,
    path = "/api/admin/vendors",
    responses(
        (status = 200, description = "Registered vendors", body = crate::ApiResponse<VendorListResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<VendorListResponse>>, ServiceError> {
    let service = VendorService::new(state.store.clone(), state.locks.clone());
    let vendors = service.list().await?;
    Ok(Json(ApiResponse::success(VendorListResponse { vendors })))
}

/// Register a vendor
#[utoipa::path(
    post,
    path = "/api/admin/vendors/add",
    request_body = AddVendorRequest,
    responses(
        (status = 201, description = "Vendor registered", body = crate::ApiResponse<AddVendorResponse>),
        (status = 400, description = "Missing name or contact", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_vendor(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<AddVendorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AddVendorResponse>>), ServiceError> {
    request.validate()?;

    let service = VendorService::new(state.store.clone(), state.locks.clone());
    let vendor_id = service
        .add(
            &request.name,
            &request.contact,
            request.phone.as_deref(),
            request.service_type.as_deref(),
            state.config.local_now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AddVendorResponse { vendor_id })),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/master", get(inventory_master))
        .route("/inventory/update", put(update_material))
        .route("/vendors", get(list_vendors))
        .route("/vendors/add", post(add_vendor))
}
