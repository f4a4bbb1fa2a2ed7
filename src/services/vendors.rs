//! Vendor reference data (admin-managed).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{next_sequential_id, SharedLocks};
use crate::errors::ServiceError;
use crate::models::cell;
use crate::store::{Sheet, SharedStore};

const VENDORS_RANGE: &str = "A:E";

/// Columns: vendor_id, name, contact, phone, service_type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    #[schema(example = "V25-001")]
    pub vendor_id: String,
    #[schema(example = "Lotus Flowers")]
    pub name: String,
    #[schema(example = "Ms. Lin")]
    pub contact: String,
    #[schema(example = "02-1234-5678")]
    pub phone: String,
    #[schema(example = "florist")]
    pub service_type: String,
}

pub struct VendorService {
    store: SharedStore,
    locks: SharedLocks,
}

impl VendorService {
    pub fn new(store: SharedStore, locks: SharedLocks) -> Self {
        Self { store, locks }
    }

    pub async fn list(&self) -> Result<Vec<Vendor>, ServiceError> {
        let rows = self.store.get_rows(Sheet::Vendors, VENDORS_RANGE).await?;
        Ok(rows
            .iter()
            .skip(1)
            .map(|row| Vendor {
                vendor_id: cell(row, 0).to_string(),
                name: cell(row, 1).to_string(),
                contact: cell(row, 2).to_string(),
                phone: cell(row, 3).to_string(),
                service_type: cell(row, 4).to_string(),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn add(
        &self,
        name: &str,
        contact: &str,
        phone: Option<&str>,
        service_type: Option<&str>,
        now: DateTime<FixedOffset>,
    ) -> Result<String, ServiceError> {
        let lock = self.locks.sequence(Sheet::Vendors);
        let _guard = lock.lock().await;

        let vendor_id = next_sequential_id(&self.store, Sheet::Vendors, "V", now).await?;
        let row = vec![
            vendor_id.clone(),
            name.to_string(),
            contact.to_string(),
            phone.unwrap_or("").to_string(),
            service_type.unwrap_or("").to_string(),
        ];
        self.store.append_row(Sheet::Vendors, row).await?;
        info!(%vendor_id, %name, "vendor added");
        Ok(vendor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::StoreLocks;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[tokio::test]
    async fn add_generates_sequential_vendor_ids() {
        let mem = Arc::new(MemoryStore::new());
        mem.seed(
            Sheet::Vendors,
            vec![vec!["vendor_id", "name", "contact", "phone", "service_type"]],
        )
        .await;
        let svc = VendorService::new(mem, Arc::new(StoreLocks::new()));
        let now = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
            .unwrap();

        let v1 = svc.add("Lotus Flowers", "Ms. Lin", None, Some("florist"), now).await.unwrap();
        let v2 = svc.add("Stone Works", "Mr. Wu", Some("02-2222-0000"), None, now).await.unwrap();
        assert_eq!(v1, "V25-001");
        assert_eq!(v2, "V25-002");

        let listed = svc.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].service_type, "florist");
        assert_eq!(listed[1].phone, "02-2222-0000");
    }
}
