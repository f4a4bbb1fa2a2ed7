//! Payment ledger: append-only collection records per case.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{format_timestamp, next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::{cell, cell_decimal};
use crate::store::{Sheet, SharedStore};

const PAYMENTS_RANGE: &str = "A:H";
const RECORDED_STATUS: &str = "succeeded";

/// Columns: payment_id, case_id, amount, kind, method, status, recorded_at,
/// recorded_by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentEntry {
    #[schema(example = "PYL25-001")]
    pub payment_id: String,
    #[schema(example = "20000")]
    pub amount: Decimal,
    #[schema(example = "deposit")]
    pub kind: String,
    #[schema(example = "bank_transfer")]
    pub method: String,
    #[schema(example = "succeeded")]
    pub status: String,
    #[schema(example = "2025-01-06 15:00:00")]
    pub recorded_at: String,
    #[schema(example = "S02")]
    pub recorded_by: String,
}

pub struct PaymentService {
    store: SharedStore,
    locks: SharedLocks,
}

impl PaymentService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    /// Append one ledger row. The ledger is append-only; nothing is ever
    /// updated in place.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        case_id: &str,
        amount: Decimal,
        kind: &str,
        method: &str,
        staff_id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "amount must be a positive number".to_string(),
            ));
        }

        let lock = self.locks.sequence(Sheet::Payments);
        let _guard = lock.lock().await;

        let payment_id = next_sequential_id(&self.store, Sheet::Payments, "PYL", now).await?;
        let row = vec![
            payment_id.clone(),
            case_id.to_string(),
            amount.to_string(),
            kind.to_string(),
            method.to_string(),
            RECORDED_STATUS.to_string(),
            format_timestamp(now),
            staff_id.to_string(),
        ];
        self.store.append_row(Sheet::Payments, row).await?;
        info!(%case_id, %payment_id, %amount, "payment recorded");
        Ok(payment_id)
    }

    /// Ledger rows for one case, in write order.
    pub async fn list_for_case(&self, case_id: &str) -> Result<Vec<PaymentEntry>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Payments, PAYMENTS_RANGE).await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter(|row| cell(row, 1) == case_id)
            .map(|row| PaymentEntry {
                payment_id: cell(row, 0).to_string(),
                amount: cell_decimal(row, 2),
                kind: cell(row, 3).to_string(),
                method: cell(row, 4).to_string(),
                status: cell(row, 5).to_string(),
                recorded_at: cell(row, 6).to_string(),
                recorded_by: cell(row, 7).to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StoreLocks;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 2, 10, 11, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn records_and_filters_by_case() {
        let mem = Arc::new(MemoryStore::new());
        mem.seed(
            Sheet::Payments,
            vec![vec![
                "payment_id", "case_id", "amount", "kind", "method", "status", "recorded_at",
                "recorded_by",
            ]],
        )
        .await;
        let svc = PaymentService::new(mem.clone(), Arc::new(StoreLocks::new()));

        let id1 = svc
            .record("P25-001", dec!(20000), "deposit", "cash", "S02", now())
            .await
            .unwrap();
        let id2 = svc
            .record("P25-002", dec!(5000), "deposit", "cash", "S02", now())
            .await
            .unwrap();
        assert_eq!(id1, "PYL25-001");
        assert_eq!(id2, "PYL25-002");

        let entries = svc.list_for_case("P25-001").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, dec!(20000));
        assert_eq!(entries[0].status, "succeeded");
    }

    #[tokio::test]
    async fn non_positive_amounts_are_rejected() {
        let svc = PaymentService::new(Arc::new(MemoryStore::new()), Arc::new(StoreLocks::new()));
        let err = svc
            .record("P25-001", dec!(0), "deposit", "cash", "S02", now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
