//! Tabular store abstraction.
//!
//! The system of record is a spreadsheet-style service: one workbook, one tab
//! per entity, row 0 of every tab a header row that consumers must skip.
//! Services talk to it through [`TabularStore`] so the record and report logic
//! stays storage-agnostic; the two implementations are a remote sheets client
//! and an in-memory store for tests and local development.

use std::sync::Arc;

use async_trait::async_trait;

pub mod memory;
pub mod sheets;

pub use memory::MemoryStore;
pub use sheets::SheetsStore;

/// One tab of the workbook. Tab names carry the original numbering so an
/// existing workbook keeps working unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Staff,
    Cases,
    Contracts,
    Schedule,
    Reminders,
    InventoryLog,
    MaterialMaster,
    Payments,
    Vendors,
    Procurement,
}

impl Sheet {
    pub fn tab_name(self) -> &'static str {
        match self {
            Sheet::Staff => "01_staff",
            Sheet::Cases => "02_cases",
            Sheet::Contracts => "03_contracts",
            Sheet::Schedule => "04_schedule",
            Sheet::Reminders => "05_reminders",
            Sheet::InventoryLog => "06_inventory_log",
            Sheet::MaterialMaster => "07_material_master",
            Sheet::Payments => "08_payments",
            Sheet::Vendors => "09_vendors",
            Sheet::Procurement => "10_procurement",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("malformed range: {0}")]
    Range(String),
}

/// Row-oriented access to one workbook.
///
/// `range` is A1 notation relative to the tab (`A:E`, `A2:E2`, `E7`). Reads
/// include the header row; every consumer skips row 0. No retries, no
/// caching: a failed call surfaces directly and the error layer maps it
/// to a 500.
#[async_trait]
pub trait TabularStore: Send + Sync {
    async fn get_rows(&self, sheet: Sheet, range: &str) -> Result<Vec<Vec<String>>, StoreError>;

    async fn append_row(&self, sheet: Sheet, row: Vec<String>) -> Result<(), StoreError>;

    async fn update_range(
        &self,
        sheet: Sheet,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn TabularStore>;
