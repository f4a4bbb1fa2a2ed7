//! Case intake and listing.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{format_timestamp, next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::cell;
use crate::store::{Sheet, SharedStore};

const CASES_RANGE: &str = "A:E";
const INITIAL_STATUS: &str = "intake";

/// Columns: case_id, reported_at, informer, assigned_staff, status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseSummary {
    #[schema(example = "P25-001")]
    pub case_id: String,
    #[schema(example = "2025-01-05 09:12:00")]
    pub reported_at: String,
    #[schema(example = "Chen family")]
    pub informer: String,
    #[schema(example = "S02")]
    pub assigned_staff: String,
    #[schema(example = "intake")]
    pub status: String,
}

impl CaseSummary {
    pub(crate) fn from_row(row: &[String]) -> Self {
        Self {
            case_id: cell(row, 0).to_string(),
            reported_at: cell(row, 1).to_string(),
            informer: cell(row, 2).to_string(),
            assigned_staff: cell(row, 3).to_string(),
            status: cell(row, 4).to_string(),
        }
    }
}

pub struct CaseService {
    store: SharedStore,
    locks: SharedLocks,
}

impl CaseService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    /// All cases, newest first.
    pub async fn list(&self) -> Result<Vec<CaseSummary>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Cases, CASES_RANGE).await?;
        let mut cases: Vec<CaseSummary> = rows
            .iter()
            .skip(1)
            .map(|row| CaseSummary::from_row(row))
            .collect();
        cases.reverse();
        Ok(cases)
    }

    /// Intake: generate the next `P<yy>-<nnn>` id and append the case row.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        informer: &str,
        assigned_staff: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ServiceError> {
        let lock = self.locks.sequence(Sheet::Cases);
        let _guard = lock.lock().await;

        let case_id = next_sequential_id(&self.store, Sheet::Cases, "P", now).await?;
        let row = vec![
            case_id.clone(),
            format_timestamp(now),
            informer.to_string(),
            assigned_staff.to_string(),
            INITIAL_STATUS.to_string(),
        ];
        self.store.append_row(Sheet::Cases, row).await?;
        info!(%case_id, "case created");
        Ok(case_id)
    }
}
