//! Business services. Each service owns one or two tabs of the workbook and
//! is constructed per request from the shared [`crate::AppState`].

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::store::{Sheet, SharedStore};

pub mod cases;
pub mod contracts;
pub mod inventory;
pub mod notify;
pub mod payments;
pub mod procurement;
pub mod reminders;
pub mod report;
pub mod schedule;
pub mod staff;
pub mod vendors;

/// In-process serialization points for the store's read-modify-write spots.
///
/// The backing store offers no transactions, versioning or CAS, so "read
/// count, derive next id, append" and "read stock, adjust, write" both lose
/// updates under interleaving. These mutexes serialize each hot key within
/// one server instance. Concurrent writers outside this process (or a second
/// instance) remain unguarded; that is the documented gap, not a bug.
#[derive(Default)]
pub struct StoreLocks {
    sequences: DashMap<Sheet, Arc<Mutex<()>>>,
    materials: DashMap<String, Arc<Mutex<()>>>,
}

impl StoreLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock guarding sequential-id generation + append for one tab.
    pub fn sequence(&self, sheet: Sheet) -> Arc<Mutex<()>> {
        self.sequences
            .entry(sheet)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Lock guarding stock/cost updates for one material.
    pub fn material(&self, material_id: &str) -> Arc<Mutex<()>> {
        self.materials
            .entry(material_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

pub type SharedLocks = Arc<StoreLocks>;

/// Next sequence number for a tab: scan the id column, count data rows
/// (header excluded), add one. Callers must hold the tab's sequence lock
/// across this call and the subsequent append.
pub(crate) async fn next_row_sequence(
    store: &SharedStore,
    sheet: Sheet,
) -> Result<usize, ServiceError> {
    let ids = store.get_rows(sheet, "A:A").await?;
    Ok(ids.len().saturating_sub(1) + 1)
}

/// Derive the next `PREFIX<yy>-<nnn>` id for a tab.
pub(crate) async fn next_sequential_id(
    store: &SharedStore,
    sheet: Sheet,
    prefix: &str,
    now: DateTime<FixedOffset>,
) -> Result<String, ServiceError> {
    let sequence = next_row_sequence(store, sheet).await?;
    Ok(format!("{}{}-{:03}", prefix, now.format("%y"), sequence))
}

/// Business timestamp format used across all tabs.
pub(crate) fn format_timestamp(now: DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn local(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, 10, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn sequential_ids_pad_and_count_past_the_header() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mem = MemoryStore::new();
        mem.seed(
            Sheet::Cases,
            vec![vec!["case_id"], vec!["P25-001"], vec!["P25-002"]],
        )
        .await;
        let store2: SharedStore = Arc::new(mem);

        let id = next_sequential_id(&store, Sheet::Cases, "P", local(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(id, "P25-001");

        let id = next_sequential_id(&store2, Sheet::Cases, "P", local(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(id, "P25-003");
    }

    #[test]
    fn timestamps_use_the_workbook_format() {
        assert_eq!(format_timestamp(local(2025, 1, 5)), "2025-01-05 10:00:00");
    }
}
