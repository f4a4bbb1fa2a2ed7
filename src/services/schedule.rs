//! Staff shift and leave log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::cell;
use crate::store::{Sheet, SharedStore};

const SCHEDULE_RANGE: &str = "A:E";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Off,
    Duty,
    Standby,
    AnnualLeave,
}

impl FromStr for ShiftType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(ShiftType::Off),
            "duty" => Ok(ShiftType::Duty),
            "standby" => Ok(ShiftType::Standby),
            "annual_leave" => Ok(ShiftType::AnnualLeave),
            other => Err(ServiceError::ValidationError(format!(
                "invalid shift type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftType::Off => "off",
            ShiftType::Duty => "duty",
            ShiftType::Standby => "standby",
            ShiftType::AnnualLeave => "annual_leave",
        };
        f.write_str(s)
    }
}

/// Columns: log_id, staff_id, date, shift_type, applied_by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleEntry {
    #[schema(example = "L25-001")]
    pub log_id: String,
    #[schema(example = "S02")]
    pub staff_id: String,
    #[schema(example = "2025-12-24")]
    pub date: String,
    #[schema(example = "off")]
    pub shift_type: String,
    #[schema(example = "S02")]
    pub applied_by: String,
}

pub struct ScheduleService {
    store: SharedStore,
    locks: SharedLocks,
}

impl ScheduleService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    /// Schedule log, optionally restricted to an inclusive date window.
    /// Dates are `YYYY-MM-DD` strings, so plain string comparison orders them.
    pub async fn list(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ScheduleEntry>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Schedule, SCHEDULE_RANGE).await?;
        Ok(rows
            .iter()
            .skip(1)
            .map(|row| ScheduleEntry {
                log_id: cell(row, 0).to_string(),
                staff_id: cell(row, 1).to_string(),
                date: cell(row, 2).to_string(),
                shift_type: cell(row, 3).to_string(),
                applied_by: cell(row, 4).to_string(),
            })
            .filter(|entry| match (start_date, end_date) {
                (Some(start), Some(end)) => {
                    entry.date.as_str() >= start && entry.date.as_str() <= end
                }
                _ => true,
            })
            .collect())
    }

    /// Record one shift/leave application; the caller is the applier.
    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        staff_id: &str,
        date: &str,
        shift_type: ShiftType,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ServiceError> {
        let lock = self.locks.sequence(Sheet::Schedule);
        let _guard = lock.lock().await;

        let log_id = next_sequential_id(&self.store, Sheet::Schedule, "L", now).await?;
        let row = vec![
            log_id.clone(),
            staff_id.to_string(),
            date.to_string(),
            shift_type.to_string(),
            staff_id.to_string(),
        ];
        self.store.append_row(Sheet::Schedule, row).await?;
        info!(%log_id, %staff_id, %shift_type, "schedule application recorded");
        Ok(log_id)
    }
}
