//! Report aggregation — the financial core.
//!
//! Joins four independently-read tabs (cases, contracts, payments, inventory
//! log) in memory, keyed by case id, into one financial snapshot per case.
//! The aggregation is read-only and idempotent. It is NOT atomic across the
//! four reads: there is no snapshot isolation, and a write landing between
//! two of the reads can produce an internally inconsistent snapshot. That is
//! an accepted limitation of the backing store, not something this module
//! papers over.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{cell, cell_decimal};
use crate::store::{Sheet, SharedStore, StoreError};

/// Column windows matching what the aggregation actually consumes.
const CASES_RANGE: &str = "A:E";
const CONTRACTS_RANGE: &str = "A:F";
const PAYMENTS_RANGE: &str = "A:C";
/// Inventory log read starts at column B, so case_id lands at offset 0 and
/// total_cost at offset 4.
const INVENTORY_RANGE: &str = "B:F";

const NO_CONTRACT_STATUS: &str = "unsigned";

/// One aggregated snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaseFinancials {
    #[schema(example = "P25-001")]
    pub case_id: String,
    #[schema(example = "2025-01-05 09:12:00")]
    pub reported_at: String,
    #[schema(example = "Chen family")]
    pub informer: String,
    #[schema(example = "S02")]
    pub assigned_staff: String,
    #[schema(example = "in_progress")]
    pub case_status: String,
    #[schema(example = "50000")]
    pub contract_fee: Decimal,
    #[schema(example = "signed")]
    pub contract_status: String,
    #[schema(example = "8000")]
    pub material_cost: Decimal,
    #[schema(example = "30000")]
    pub collected: Decimal,
    /// `contract_fee - collected`; negative when overpaid
    #[schema(example = "20000")]
    pub outstanding: Decimal,
    /// `contract_fee - material_cost`
    #[schema(example = "42000")]
    pub net_profit: Decimal,
    /// `net_profit / contract_fee * 100`, two decimals, `0.00%` when no fee
    #[schema(example = "84.00%")]
    pub profit_margin: String,
}

/// Full row sets of the four source tabs, exactly as read.
pub struct SourceRows {
    pub cases: Vec<Vec<String>>,
    pub contracts: Vec<Vec<String>>,
    pub payments: Vec<Vec<String>>,
    pub inventory: Vec<Vec<String>>,
}

struct ContractInfo {
    total_fee: Decimal,
    status: String,
}

/// Pure in-memory join over the source rows (header rows included, skipped
/// here). Output is in case-tab order; callers decide presentation order.
pub fn aggregate(sources: &SourceRows) -> Vec<CaseFinancials> {
    // First contract row per case wins; later rows for the same case are
    // ignored. Recorded open question — switching the join to "most recent"
    // or "status == signed" happens here and nowhere else.
    let mut contract_map: HashMap<String, ContractInfo> = HashMap::new();
    for row in sources.contracts.iter().skip(1) {
        let case_id = cell(row, 0).to_string();
        contract_map.entry(case_id).or_insert_with(|| ContractInfo {
            total_fee: cell_decimal(row, 2),
            status: {
                let s = cell(row, 3);
                if s.is_empty() { NO_CONTRACT_STATUS.to_string() } else { s.to_string() }
            },
        });
    }

    // Cumulative collected amount per case.
    let mut payment_map: HashMap<String, Decimal> = HashMap::new();
    for row in sources.payments.iter().skip(1) {
        let case_id = cell(row, 1).to_string();
        *payment_map.entry(case_id).or_insert(Decimal::ZERO) += cell_decimal(row, 2);
    }

    // Cumulative consumed-material cost per case. The log's total_cost was
    // locked at consumption time; it is summed, never recomputed.
    let mut inventory_map: HashMap<String, Decimal> = HashMap::new();
    for row in sources.inventory.iter().skip(1) {
        let case_id = cell(row, 0).to_string();
        *inventory_map.entry(case_id).or_insert(Decimal::ZERO) += cell_decimal(row, 4);
    }

    sources
        .cases
        .iter()
        .skip(1)
        .map(|row| {
            let case_id = cell(row, 0).to_string();
            let contract = contract_map.get(&case_id);
            let contract_fee = contract.map(|c| c.total_fee).unwrap_or(Decimal::ZERO);
            let collected = payment_map.get(&case_id).copied().unwrap_or(Decimal::ZERO);
            let material_cost = inventory_map.get(&case_id).copied().unwrap_or(Decimal::ZERO);

            let net_profit = contract_fee - material_cost;
            let margin = if contract_fee > Decimal::ZERO {
                net_profit / contract_fee * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };

            CaseFinancials {
                case_id,
                reported_at: cell(row, 1).to_string(),
                informer: cell(row, 2).to_string(),
                assigned_staff: cell(row, 3).to_string(),
                case_status: cell(row, 4).to_string(),
                contract_fee,
                contract_status: contract
                    .map(|c| c.status.clone())
                    .unwrap_or_else(|| NO_CONTRACT_STATUS.to_string()),
                material_cost,
                collected,
                outstanding: contract_fee - collected,
                net_profit,
                profit_margin: format!("{:.2}%", margin),
            }
        })
        .collect()
}

pub struct ReportService {
    store: SharedStore,
}

impl ReportService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Read all four source tabs. Any single read failure aborts the whole
    /// aggregation; partial output is never produced.
    async fn load_sources(&self) -> Result<SourceRows, ServiceError> {
        let wrap = |tab: &str| {
            let tab = tab.to_string();
            move |e: StoreError| ServiceError::AggregationFailed(format!("{tab}: {e}"))
        };

        let (cases, contracts, payments, inventory) = tokio::try_join!(
            async {
                self.store
                    .get_rows(Sheet::Cases, CASES_RANGE)
                    .await
                    .map_err(wrap("cases"))
            },
            async {
                self.store
                    .get_rows(Sheet::Contracts, CONTRACTS_RANGE)
                    .await
                    .map_err(wrap("contracts"))
            },
            async {
                self.store
                    .get_rows(Sheet::Payments, PAYMENTS_RANGE)
                    .await
                    .map_err(wrap("payments"))
            },
            async {
                self.store
                    .get_rows(Sheet::InventoryLog, INVENTORY_RANGE)
                    .await
                    .map_err(wrap("inventory log"))
            },
        )?;

        Ok(SourceRows { cases, contracts, payments, inventory })
    }

    /// All-cases snapshot, most recently created case first.
    #[instrument(skip(self))]
    pub async fn all_cases(&self) -> Result<Vec<CaseFinancials>, ServiceError> {
        let sources = self.load_sources().await?;
        let mut results = aggregate(&sources);
        results.reverse();
        Ok(results)
    }

    /// Filtered snapshot: case-insensitive substring match on case id
    /// (uppercase normalization on both sides). Zero matches is a not-found
    /// condition, not an empty success.
    #[instrument(skip(self))]
    pub async fn query(&self, case_id: Option<&str>) -> Result<Vec<CaseFinancials>, ServiceError> {
        let sources = self.load_sources().await?;
        let mut results = aggregate(&sources);

        if let Some(filter) = case_id {
            let needle = filter.to_uppercase();
            results.retain(|r| r.case_id.to_uppercase().contains(&needle));
        }

        if results.is_empty() {
            return Err(ServiceError::NotFound(
                "no cases matched the query".to_string(),
            ));
        }
        Ok(results)
    }
}
