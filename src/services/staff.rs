//! Staff roster lookup backing login.

use tracing::warn;

use crate::errors::ServiceError;
use crate::models::StaffRecord;
use crate::store::{Sheet, SharedStore};

const STAFF_RANGE: &str = "A:F";

pub struct StaffDirectory {
    store: SharedStore,
}

impl StaffDirectory {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Roster lookup: username matches the email column case-insensitively,
    /// only `Active` rows qualify, and the password cell is compared in
    /// plaintext (hardening is out of scope for this system).
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StaffRecord, ServiceError> {
        let rows = self.store.get_rows(Sheet::Staff, STAFF_RANGE).await?;
        let staff = rows
            .iter()
            .skip(1)
            .map(|row| StaffRecord::from_row(row))
            .filter(StaffRecord::is_active)
            .find(|s| s.email.eq_ignore_ascii_case(username));

        match staff {
            Some(s) if s.password == password => Ok(s),
            Some(s) => {
                warn!(staff_id = %s.staff_id, "login rejected: password mismatch");
                Err(ServiceError::AuthError(
                    "invalid credentials or insufficient access".to_string(),
                ))
            }
            None => Err(ServiceError::AuthError(
                "invalid credentials or insufficient access".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    async fn directory() -> StaffDirectory {
        let store = MemoryStore::new();
        store
            .seed(
                Sheet::Staff,
                vec![
                    vec!["staff_id", "name", "email", "password", "role", "status"],
                    vec!["S01", "Alice", "alice@example.com", "pw1", "Administrator", "Active"],
                    vec!["S02", "Bob", "bob@example.com", "pw2", "Staff", "Active"],
                    vec!["S03", "Wei", "wei@example.com", "pw3", "Staff", "Suspended"],
                ],
            )
            .await;
        StaffDirectory::new(Arc::new(store))
    }

    #[tokio::test]
    async fn email_match_is_case_insensitive() {
        let dir = directory().await;
        let staff = dir.authenticate("ALICE@example.com", "pw1").await.unwrap();
        assert_eq!(staff.staff_id, "S01");
    }

    #[tokio::test]
    async fn wrong_password_and_inactive_staff_are_rejected() {
        let dir = directory().await;
        assert!(dir.authenticate("bob@example.com", "nope").await.is_err());
        assert!(dir.authenticate("wei@example.com", "pw3").await.is_err());
        assert!(dir.authenticate("ghost@example.com", "pw").await.is_err());
    }
}
