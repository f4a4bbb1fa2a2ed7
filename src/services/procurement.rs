//! Vendor procurement: restock logging plus the master-side effects.
//!
//! Restocking writes the procurement log row, then applies last-in pricing
//! to the material master: `current_cost` is overwritten with the new unit
//! cost and `current_stock` incremented in one range write.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{format_timestamp, next_row_sequence, SharedLocks};
use crate::errors::ServiceError;
use crate::models::{cell, cell_decimal};
use crate::store::{Sheet, SharedStore};

const PROCUREMENT_RANGE: &str = "A:H";
const MASTER_RANGE: &str = "A:E";
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Serialize, ToSchema)]
pub struct RestockOutcome {
    #[schema(example = "PR2504-001")]
    pub procurement_id: String,
    #[schema(example = "60")]
    pub new_stock: Decimal,
    #[schema(example = "130")]
    pub new_cost: Decimal,
}

/// Columns: procurement_id, recorded_at, vendor_id, material_id, quantity,
/// unit_cost, total_cost, staff_id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcurementEntry {
    pub procurement_id: String,
    pub recorded_at: String,
    pub vendor_id: String,
    pub material_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub staff_id: String,
}

pub struct ProcurementService {
    store: SharedStore,
    locks: SharedLocks,
}

impl ProcurementService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    /// Restock one material from a vendor.
    ///
    /// The log row is appended before the master is touched (write order of
    /// the workbook process this replaces); an unknown material therefore
    /// leaves the log row behind and fails with 404. The master update runs
    /// under the per-material lock with a fresh stock read.
    #[instrument(skip(self))]
    pub async fn restock(
        &self,
        vendor_id: &str,
        material_id: &str,
        quantity: i64,
        unit_cost: Decimal,
        staff_id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<RestockOutcome, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "quantity must be greater than zero".to_string(),
            ));
        }
        if unit_cost < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "unit cost cannot be negative".to_string(),
            ));
        }

        let quantity_dec = Decimal::from(quantity);
        let total_cost = unit_cost * quantity_dec;

        let procurement_id = {
            let lock = self.locks.sequence(Sheet::Procurement);
            let _guard = lock.lock().await;
            let sequence = next_row_sequence(&self.store, Sheet::Procurement).await?;
            let id = format!("PR{}-{:03}", now.format("%y%m"), sequence);
            let row = vec![
                id.clone(),
                format_timestamp(now),
                vendor_id.to_string(),
                material_id.to_string(),
                quantity.to_string(),
                unit_cost.to_string(),
                total_cost.to_string(),
                staff_id.to_string(),
            ];
            self.store.append_row(Sheet::Procurement, row).await?;
            id
        };

        // Locate the master row by linear scan.
        let master_rows = self.store.get_rows(Sheet::MaterialMaster, MASTER_RANGE).await?;
        let position = master_rows
            .iter()
            .skip(1)
            .position(|row| cell(row, 0) == material_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "material {material_id} is not listed in the material master"
                ))
            })?;
        let sheet_row = position + FIRST_DATA_ROW;

        let new_stock = {
            let lock = self.locks.material(material_id);
            let _guard = lock.lock().await;
            let stock_range = format!("E{sheet_row}");
            let current = self.store.get_rows(Sheet::MaterialMaster, &stock_range).await?;
            let stock = current
                .first()
                .map(|row| cell_decimal(row, 0))
                .unwrap_or(Decimal::ZERO);
            let new_stock = stock + quantity_dec;
            // Last-in pricing: the new unit cost overwrites the standing cost.
            self.store
                .update_range(
                    Sheet::MaterialMaster,
                    &format!("D{sheet_row}:E{sheet_row}"),
                    vec![vec![unit_cost.to_string(), new_stock.to_string()]],
                )
                .await?;
            new_stock
        };

        info!(%procurement_id, %material_id, %new_stock, %unit_cost, "restock applied");
        Ok(RestockOutcome {
            procurement_id,
            new_stock,
            new_cost: unit_cost,
        })
    }

    /// Procurement history, newest first.
    pub async fn history(&self) -> Result<Vec<ProcurementEntry>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Procurement, PROCUREMENT_RANGE).await?;
        let mut entries: Vec<ProcurementEntry> = rows
            .iter()
            .skip(1)
            .map(|row| ProcurementEntry {
                procurement_id: cell(row, 0).to_string(),
                recorded_at: cell(row, 1).to_string(),
                vendor_id: cell(row, 2).to_string(),
                material_id: cell(row, 3).to_string(),
                quantity: cell_decimal(row, 4),
                unit_cost: cell_decimal(row, 5),
                total_cost: cell_decimal(row, 6),
                staff_id: cell(row, 7).to_string(),
            })
            .collect();
        entries.reverse();
        Ok(entries)
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
            .with_ymd_and_hms(2025, 4, 20, 16, 0, 0)
            .unwrap()
    }

    async fn seeded() -> (Arc<MemoryStore>, ProcurementService) {
        let mem = Arc::new(MemoryStore::new());
        mem.seed(
            Sheet::MaterialMaster,
            vec![
                vec!["material_id", "name", "unit", "current_cost", "current_stock"],
                vec!["M01", "urn", "pc", "100", "50"],
            ],
        )
        .await;
        mem.seed(
            Sheet::Procurement,
            vec![vec![
                "procurement_id", "recorded_at", "vendor_id", "material_id", "quantity",
                "unit_cost", "total_cost", "staff_id",
            ]],
        )
        .await;
        let svc = ProcurementService::new(mem.clone(), Arc::new(StoreLocks::new()));
        (mem, svc)
    }

    #[tokio::test]
    async fn restock_applies_last_in_pricing() {
        let (mem, svc) = seeded().await;
        let outcome = svc
            .restock("V25-001", "M01", 10, dec!(130), "S01", now())
            .await
            .unwrap();
        assert_eq!(outcome.procurement_id, "PR2504-001");
        assert_eq!(outcome.new_stock, dec!(60));
        assert_eq!(outcome.new_cost, dec!(130));

        let master = mem.snapshot(Sheet::MaterialMaster).await;
        assert_eq!(master[1][3], "130");
        assert_eq!(master[1][4], "60");

        let log = mem.snapshot(Sheet::Procurement).await;
        assert_eq!(log[1][6], "1300");
    }

    #[tokio::test]
    async fn invalid_inputs_are_rejected() {
        let (_mem, svc) = seeded().await;
        assert!(svc
            .restock("V25-001", "M01", 0, dec!(130), "S01", now())
            .await
            .is_err());
        assert!(svc
            .restock("V25-001", "M01", 5, dec!(-1), "S01", now())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn unknown_material_fails_after_the_log_write() {
        let (mem, svc) = seeded().await;
        let err = svc
            .restock("V25-001", "M99", 5, dec!(10), "S01", now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        // Write order preserved from the workbook process: log row exists.
        assert_eq!(mem.snapshot(Sheet::Procurement).await.len(), 2);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let (_mem, svc) = seeded().await;
        svc.restock("V25-001", "M01", 1, dec!(100), "S01", now()).await.unwrap();
        svc.restock("V25-002", "M01", 2, dec!(110), "S01", now()).await.unwrap();
        let history = svc.history().await.unwrap();
        assert_eq!(history[0].procurement_id, "PR2504-002");
        assert_eq!(history[1].procurement_id, "PR2504-001");
    }
}
