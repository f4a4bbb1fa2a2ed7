use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Funeral Ops API",
        version = "1.0.0",
        description = r#"
Back-office API for a funeral service provider: case intake, contracts,
scheduling, reminders, consumable inventory, payments, vendor procurement
and the per-case financial report.

All endpoints except `/api/auth/login` require a bearer token:

```
Authorization: Bearer <jwt>
```

Routes under `/api/admin` additionally require the Administrator role.
        "#
    ),
    tags(
        (name = "Auth", description = "Login against the staff roster"),
        (name = "Cases", description = "Case intake and listing"),
        (name = "Contracts", description = "Contract drafting"),
        (name = "Schedule", description = "Shift and leave applications"),
        (name = "Reminders", description = "Case reminders and ritual dates"),
        (name = "Inventory", description = "Material master and consumption"),
        (name = "Payments", description = "Payment ledger"),
        (name = "Procurement", description = "Vendor restocking"),
        (name = "Report", description = "Per-case financial aggregation"),
        (name = "Admin", description = "Administrator-only maintenance"),
        (name = "Notify", description = "Reminder digest push")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::cases::list_cases,
        crate::handlers::cases::add_case,
        crate::handlers::contracts::add_contract,
        crate::handlers::schedule::list_schedule,
        crate::handlers::schedule::apply_shift,
        crate::handlers::reminders::list_reminders,
        crate::handlers::reminders::add_reminder,
        crate::handlers::reminders::calculate_date,
        crate::handlers::inventory::master_list,
        crate::handlers::inventory::consume,
        crate::handlers::payments::record_payment,
        crate::handlers::payments::case_payments,
        crate::handlers::procurement::restock,
        crate::handlers::procurement::history,
        crate::handlers::report::all_cases,
        crate::handlers::report::query,
        crate::handlers::admin::inventory_master,
        crate::handlers::admin::update_material,
        crate::handlers::admin::list_vendors,
        crate::handlers::admin::add_vendor,
        crate::handlers::notify::check_today,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::auth::AuthUser,

            crate::handlers::cases::CaseListResponse,
            crate::handlers::cases::AddCaseRequest,
            crate::handlers::cases::AddCaseResponse,
            crate::services::cases::CaseSummary,

            crate::handlers::contracts::AddContractRequest,
            crate::services::contracts::ContractItem,
            crate::services::contracts::ContractDraft,

            crate::handlers::schedule::ApplyShiftRequest,
            crate::handlers::schedule::ApplyShiftResponse,
            crate::services::schedule::ScheduleEntry,
            crate::services::schedule::ShiftType,

            crate::handlers::reminders::AddReminderRequest,
            crate::handlers::reminders::AddReminderResponse,
            crate::handlers::reminders::CalculateDateRequest,
            crate::handlers::reminders::CalculateDateResponse,
            crate::services::reminders::Reminder,
            crate::services::reminders::RitualKind,

            crate::handlers::inventory::ConsumeRequest,
            crate::handlers::inventory::MasterListResponse,
            crate::services::inventory::ConsumeItem,
            crate::services::inventory::ConsumeOutcome,
            crate::models::Material,

            crate::handlers::payments::RecordPaymentRequest,
            crate::handlers::payments::RecordPaymentResponse,
            crate::handlers::payments::CasePaymentsResponse,
            crate::services::payments::PaymentEntry,

            crate::handlers::procurement::RestockRequest,
            crate::handlers::procurement::HistoryResponse,
            crate::services::procurement::RestockOutcome,
            crate::services::procurement::ProcurementEntry,

            crate::handlers::report::ReportResponse,
            crate::services::report::CaseFinancials,

            crate::handlers::admin::UpdateMaterialRequest,
            crate::handlers::admin::AddVendorRequest,
            crate::handlers::admin::AddVendorResponse,
            crate::handlers::admin::VendorListResponse,
            crate::handlers::admin::AdminMasterResponse,
            crate::services::vendors::Vendor,

            crate::services::notify::DigestOutcome,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
