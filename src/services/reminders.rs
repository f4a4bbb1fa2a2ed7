//! Case reminders and the ritual date calculator.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::cell;
use crate::store::{Sheet, SharedStore};

const REMINDERS_RANGE: &str = "A:G";
const INITIAL_STATUS: &str = "pending";
const DEFAULT_CATEGORY: &str = "manual";

/// Statuses excluded from the default listing.
const CLOSED_STATUSES: [&str; 2] = ["done", "dismissed"];

/// Columns: reminder_id, case_id, remind_on, category, content, status,
/// created_by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reminder {
    #[schema(example = "R25-001")]
    pub reminder_id: String,
    #[schema(example = "P25-001")]
    pub case_id: String,
    #[schema(example = "2025-04-15")]
    pub remind_on: String,
    #[schema(example = "manual")]
    pub category: String,
    #[schema(example = "confirm flower order with vendor")]
    pub content: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "S02")]
    pub created_by: String,
}

impl Reminder {
    pub(crate) fn from_row(row: &[String]) -> Self {
        Self {
            reminder_id: cell(row, 0).to_string(),
            case_id: cell(row, 1).to_string(),
            remind_on: cell(row, 2).to_string(),
            category: cell(row, 3).to_string(),
            content: cell(row, 4).to_string(),
            status: cell(row, 5).to_string(),
            created_by: cell(row, 6).to_string(),
        }
    }
}

/// Traditional observances counted from the date of passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RitualKind {
    /// 49th day (7x7)
    SeventhWeek,
    /// 100th day
    HundredthDay,
    /// one full year
    FirstAnniversary,
    /// three full years
    ThirdAnniversary,
}

impl FromStr for RitualKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seventh_week" => Ok(RitualKind::SeventhWeek),
            "hundredth_day" => Ok(RitualKind::HundredthDay),
            "first_anniversary" => Ok(RitualKind::FirstAnniversary),
            "third_anniversary" => Ok(RitualKind::ThirdAnniversary),
            other => Err(ServiceError::ValidationError(format!(
                "unsupported ritual kind: {other}"
            ))),
        }
    }
}

impl RitualKind {
    pub fn label(self) -> &'static str {
        match self {
            RitualKind::SeventhWeek => "seventh week (day 49)",
            RitualKind::HundredthDay => "hundredth day (day 100)",
            RitualKind::FirstAnniversary => "first anniversary",
            RitualKind::ThirdAnniversary => "third anniversary",
        }
    }
}

/// The start date counts as day 1, so day N is `start + (N - 1)`.
/// Anniversaries fall on the same month/day of the later year; Feb 29
/// observances shift to Feb 28 in non-leap years.
pub fn ritual_date(start: NaiveDate, kind: RitualKind) -> NaiveDate {
    match kind {
        RitualKind::SeventhWeek => start + Duration::days(48),
        RitualKind::HundredthDay => start + Duration::days(99),
        RitualKind::FirstAnniversary => add_years(start, 1),
        RitualKind::ThirdAnniversary => add_years(start, 3),
    }
}

fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() + years, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(date.year() + years, date.month(), 28))
        .unwrap_or(date)
}

pub struct ReminderService {
    store: SharedStore,
    locks: SharedLocks,
}

impl ReminderService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    /// Open reminders, optionally for one case. Closed statuses (`done`,
    /// `dismissed`) never show in the default listing.
    pub async fn list(&self, case_id: Option<&str>) -> Result<Vec<Reminder>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Reminders, REMINDERS_RANGE).await?;
        Ok(rows
            .iter()
            .skip(1)
            .map(|row| Reminder::from_row(row))
            .filter(|r| !CLOSED_STATUSES.contains(&r.status.as_str()))
            .filter(|r| case_id.map_or(true, |id| r.case_id == id))
            .collect())
    }

    /// Reminders due on one date with `pending` status — the daily digest set.
    pub async fn due_on(&self, date: &str) -> Result<Vec<Reminder>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Reminders, REMINDERS_RANGE).await?;
        Ok(rows
            .iter()
            .skip(1)
            .map(|row| Reminder::from_row(row))
            .filter(|r| r.remind_on == date && r.status == INITIAL_STATUS)
            .collect())
    }

    #[instrument(skip(self, content))]
    pub async fn add(
        &self,
        case_id: &str,
        remind_on: &str,
        category: Option<&str>,
        content: &str,
        staff_id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ServiceError> {
        let lock = self.locks.sequence(Sheet::Reminders);
        let _guard = lock.lock().await;

        let reminder_id = next_sequential_id(&self.store, Sheet::Reminders, "R", now).await?;
        let row = vec![
            reminder_id.clone(),
            case_id.to_string(),
            remind_on.to_string(),
            category.unwrap_or(DEFAULT_CATEGORY).to_string(),
            content.to_string(),
            INITIAL_STATUS.to_string(),
            staff_id.to_string(),
        ];
        self.store.append_row(Sheet::Reminders, row).await?;
        info!(%reminder_id, %case_id, "reminder created");
        Ok(reminder_id)
    }
}
