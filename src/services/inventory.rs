//! Consumable inventory: master lookups and per-case consumption logging.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{format_timestamp, next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::{cell_decimal, Material};
use crate::store::{Sheet, SharedStore};

const MASTER_RANGE: &str = "A:E";
/// 1-based sheet row of the first data row (row 1 is the header).
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsumeItem {
    #[schema(example = "M01")]
    pub material_id: String,
    #[schema(example = 5)]
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumeOutcome {
    #[schema(example = "500")]
    pub total_cost: Decimal,
    pub log_ids: Vec<String>,
}

pub struct InventoryService {
    store: SharedStore,
    locks: SharedLocks,
}

impl InventoryService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    pub async fn master_list(&self) -> Result<Vec<Material>, ServiceError> {
        let rows = self.store.get_rows(Sheet::MaterialMaster, MASTER_RANGE).await?;
        Ok(rows.iter().skip(1).map(|row| Material::from_row(row)).collect())
    }

    /// Admin edit of one master row: locate by linear scan, overwrite the
    /// whole `A{row}:E{row}` rectangle, keeping any field the caller left
    /// unspecified. Runs under the per-material lock.
    #[instrument(skip(self))]
    pub async fn update_master(
        &self,
        material_id: &str,
        name: Option<&str>,
        unit: Option<&str>,
        current_cost: Option<Decimal>,
        current_stock: Option<Decimal>,
    ) -> Result<Material, ServiceError> {
        let lock = self.locks.material(material_id);
        let _guard = lock.lock().await;

        let rows = self.store.get_rows(Sheet::MaterialMaster, MASTER_RANGE).await?;
        let position = rows
            .iter()
            .skip(1)
            .position(|row| crate::models::cell(row, 0) == material_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "material {material_id} is not listed in the material master"
                ))
            })?;
        let sheet_row = position + FIRST_DATA_ROW;

        let mut updated = Material::from_row(&rows[position + 1]);
        if let Some(name) = name {
            updated.name = name.to_string();
        }
        if let Some(unit) = unit {
            updated.unit = unit.to_string();
        }
        if let Some(cost) = current_cost {
            updated.current_cost = cost;
        }
        if let Some(stock) = current_stock {
            updated.current_stock = stock;
        }

        self.store
            .update_range(
                Sheet::MaterialMaster,
                &format!("A{sheet_row}:E{sheet_row}"),
                vec![updated.to_row()],
            )
            .await?;
        info!(%material_id, "material master updated");
        Ok(updated)
    }

    /// Record consumption for one case.
    ///
    /// The unit cost is locked from the master at write time; a later master
    /// cost change never alters an already-written log row. Stock updates go
    /// through the per-material lock with a fresh read of the stock cell, so
    /// two in-process consumers cannot lose each other's decrement. All
    /// materials are resolved before anything is written: an unknown id
    /// fails the whole request with no partial log rows.
    ///
    /// Log columns: log_id, case_id, material_id, quantity, cost_per_unit,
    /// total_cost, recorded_at, staff_id.
    #[instrument(skip(self, items))]
    pub async fn consume(
        &self,
        case_id: &str,
        items: &[ConsumeItem],
        staff_id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<ConsumeOutcome, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "consumption requires at least one item".to_string(),
            ));
        }

        let master_rows = self.store.get_rows(Sheet::MaterialMaster, MASTER_RANGE).await?;
        let masters: Vec<Material> = master_rows
            .iter()
            .skip(1)
            .map(|row| Material::from_row(row))
            .collect();

        // Resolve every line before writing anything.
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity <= 0 {
                continue;
            }
            let position = masters
                .iter()
                .position(|m| m.material_id == item.material_id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "material {} is not listed in the material master",
                        item.material_id
                    ))
                })?;
            resolved.push((item, &masters[position], position + FIRST_DATA_ROW));
        }

        let timestamp = format_timestamp(now);
        let mut total_cost = Decimal::ZERO;
        let mut log_ids = Vec::with_capacity(resolved.len());

        for (item, master, sheet_row) in resolved {
            let quantity = Decimal::from(item.quantity);
            let cost_per_unit = master.current_cost;
            let item_total = cost_per_unit * quantity;
            total_cost += item_total;

            let log_id = {
                let lock = self.locks.sequence(Sheet::InventoryLog);
                let _guard = lock.lock().await;
                let log_id =
                    next_sequential_id(&self.store, Sheet::InventoryLog, "J", now).await?;
                let row = vec![
                    log_id.clone(),
                    case_id.to_string(),
                    item.material_id.clone(),
                    item.quantity.to_string(),
                    cost_per_unit.to_string(),
                    item_total.to_string(),
                    timestamp.clone(),
                    staff_id.to_string(),
                ];
                self.store.append_row(Sheet::InventoryLog, row).await?;
                log_id
            };

            // Stock decrement: fresh read of the stock cell under the
            // material lock. May go negative; the workbook does not guard
            // against over-consumption and neither do we.
            {
                let lock = self.locks.material(&item.material_id);
                let _guard = lock.lock().await;
                let stock_range = format!("E{sheet_row}");
                let current = self.store.get_rows(Sheet::MaterialMaster, &stock_range).await?;
                let stock = current
                    .first()
                    .map(|row| cell_decimal(row, 0))
                    .unwrap_or(Decimal::ZERO);
                let new_stock = stock - quantity;
                self.store
                    .update_range(
                        Sheet::MaterialMaster,
                        &stock_range,
                        vec![vec![new_stock.to_string()]],
                    )
                    .await?;
            }

            info!(%case_id, material_id = %item.material_id, %log_id, %item_total, "consumption recorded");
            log_ids.push(log_id);
        }

        Ok(ConsumeOutcome { total_cost, log_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StoreLocks;
    use crate::store::{MemoryStore, TabularStore};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 4, 2, 9, 0, 0)
            .unwrap()
    }

    async fn seeded() -> (Arc<MemoryStore>, InventoryService) {
        let mem = Arc::new(MemoryStore::new());
        mem.seed(
            Sheet::MaterialMaster,
            vec![
                vec!["material_id", "name", "unit", "current_cost", "current_stock"],
                vec!["M01", "urn", "pc", "100", "50"],
                vec!["M02", "incense", "box", "30", "200"],
            ],
        )
        .await;
        mem.seed(
            Sheet::InventoryLog,
            vec![vec![
                "log_id", "case_id", "material_id", "quantity", "cost_per_unit", "total_cost",
                "recorded_at", "staff_id",
            ]],
        )
        .await;
        let svc = InventoryService::new(mem.clone(), Arc::new(StoreLocks::new()));
        (mem, svc)
    }

    #[tokio::test]
    async fn cost_is_locked_and_stock_decremented() {
        let (mem, svc) = seeded().await;
        let outcome = svc
            .consume(
                "P25-001",
                &[ConsumeItem { material_id: "M01".into(), quantity: 5 }],
                "S02",
                now(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.total_cost, dec!(500));
        assert_eq!(outcome.log_ids, vec!["J25-001".to_string()]);

        let log = mem.snapshot(Sheet::InventoryLog).await;
        assert_eq!(log[1][4], "100");
        assert_eq!(log[1][5], "500");

        let master = mem.snapshot(Sheet::MaterialMaster).await;
        assert_eq!(master[1][4], "45");

        // A later master cost change must not touch the written log row.
        mem.update_range(Sheet::MaterialMaster, "D2", vec![vec!["120".to_string()]])
            .await
            .unwrap();
        let log = mem.snapshot(Sheet::InventoryLog).await;
        assert_eq!(log[1][4], "100");
        assert_eq!(log[1][5], "500");
    }

    #[tokio::test]
    async fn unknown_material_writes_nothing() {
        let (mem, svc) = seeded().await;
        let err = svc
            .consume(
                "P25-001",
                &[
                    ConsumeItem { material_id: "M01".into(), quantity: 1 },
                    ConsumeItem { material_id: "M99".into(), quantity: 1 },
                ],
                "S02",
                now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(mem.snapshot(Sheet::InventoryLog).await.len(), 1);
        assert_eq!(mem.snapshot(Sheet::MaterialMaster).await[1][4], "50");
    }

    #[tokio::test]
    async fn master_update_keeps_unspecified_fields() {
        let (mem, svc) = seeded().await;
        let updated = svc
            .update_master("M01", None, None, Some(dec!(120)), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "urn");
        assert_eq!(updated.current_cost, dec!(120));
        assert_eq!(updated.current_stock, dec!(50));

        let master = mem.snapshot(Sheet::MaterialMaster).await;
        assert_eq!(master[1], vec!["M01", "urn", "pc", "120", "50"]);

        let err = svc
            .update_master("M99", Some("ghost"), None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_positive_quantities_are_skipped() {
        let (mem, svc) = seeded().await;
        let outcome = svc
            .consume(
                "P25-001",
                &[
                    ConsumeItem { material_id: "M01".into(), quantity: 0 },
                    ConsumeItem { material_id: "M02".into(), quantity: 2 },
                ],
                "S02",
                now(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.total_cost, dec!(60));
        let master = mem.snapshot(Sheet::MaterialMaster).await;
        assert_eq!(master[1][4], "50");
        assert_eq!(master[2][4], "198");
    }
}
