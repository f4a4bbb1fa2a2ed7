//! Contract drafting: itemized service lines rolled up into one workbook row.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::format_timestamp;
use crate::errors::ServiceError;
use crate::store::{Sheet, SharedStore};

pub const DEFAULT_STATUS: &str = "draft";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContractItem {
    #[validate(length(min = 1))]
    #[schema(example = "ceremony hall rental")]
    pub description: String,
    #[schema(example = "20000")]
    pub price: Decimal,
    /// Defaults to 1 when omitted
    #[schema(example = 2)]
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractDraft {
    #[schema(example = "50000")]
    pub total_fee: Decimal,
    #[schema(example = "ceremony hall rental (40000); standard urn (10000)")]
    pub summary: String,
}

pub struct ContractService {
    store: SharedStore,
}

impl ContractService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Append one contract row for the case. The total is a plain
    /// `price x quantity` sum over the submitted lines; the report
    /// aggregator never re-derives it from the items.
    ///
    /// Columns: case_id, service_summary, total_fee, status, signed_by, signed_at.
    #[instrument(skip(self, items))]
    pub async fn add(
        &self,
        case_id: &str,
        items: &[ContractItem],
        status: &str,
        signed_by: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<ContractDraft, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "a contract requires at least one service line".to_string(),
            ));
        }

        let mut total_fee = Decimal::ZERO;
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let quantity = item.quantity.unwrap_or(Decimal::ONE);
            let subtotal = item.price * quantity;
            total_fee += subtotal;
            lines.push(format!("{} ({})", item.description, subtotal));
        }
        let summary = lines.join("; ");

        let row = vec![
            case_id.to_string(),
            summary.clone(),
            total_fee.to_string(),
            status.to_string(),
            signed_by.to_string(),
            format_timestamp(now),
        ];
        self.store.append_row(Sheet::Contracts, row).await?;
        info!(%case_id, %total_fee, "contract draft recorded");

        Ok(ContractDraft { total_fee, summary })
    }
}
