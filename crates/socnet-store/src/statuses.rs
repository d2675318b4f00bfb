//! Typed operations on the status update collection

use crate::accounts::{to_set, UserAccounts};
use crate::error::{Result, StoreError};
use crate::filter::Filter;
use crate::store::RecordStore;
use serde_json::json;
use socnet_common::{Collection, Record, StatusUpdate};
use tracing::{debug, info};

/// Status updates backed by a [`RecordStore`]
pub struct StatusUpdates<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> StatusUpdates<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn len(&self) -> Result<u64> {
        self.store.count(Collection::Statuses, &Filter::all())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Fail with `OwnerNotFound` unless the status's user exists
    pub fn check_owner(&self, status: &StatusUpdate) -> Result<()> {
        if UserAccounts::new(self.store).exists(&status.user_id)? {
            Ok(())
        } else {
            Err(StoreError::OwnerNotFound {
                status_id: status.status_id.clone(),
                user_id: status.user_id.clone(),
            })
        }
    }

    /// Add a status for an existing user
    ///
    /// The owner is checked first; a status for an unknown user never
    /// reaches the insert.
    pub fn add_status(&self, status: &StatusUpdate) -> Result<()> {
        self.check_owner(status)?;
        self.store
            .insert_one(Collection::Statuses, &status.to_document()?)?;
        debug!(status_id = %status.status_id, user_id = %status.user_id, "Status added");
        Ok(())
    }

    /// Reassign owner and text of an existing status
    ///
    /// The new owner is not re-validated; ownership is checked only when a
    /// status is created.
    pub fn update_status(&self, status_id: &str, user_id: &str, status_text: &str) -> Result<()> {
        let set = to_set(json!({
            "user_id": user_id,
            "status_text": status_text,
        }));

        match self.store.update_one(Collection::Statuses, status_id, &set)? {
            0 => Err(StoreError::NotFound {
                collection: Collection::Statuses,
                key: status_id.to_string(),
            }),
            _ => {
                info!(status_id = %status_id, "Modified user status");
                Ok(())
            },
        }
    }

    pub fn delete_status(&self, status_id: &str) -> Result<()> {
        match self.store.delete_one(Collection::Statuses, status_id)? {
            0 => Err(StoreError::NotFound {
                collection: Collection::Statuses,
                key: status_id.to_string(),
            }),
            _ => {
                info!(status_id = %status_id, "User status for {} was deleted", status_id);
                Ok(())
            },
        }
    }

    pub fn search_status(&self, status_id: &str) -> Result<Option<StatusUpdate>> {
        self.store
            .find_by_id(Collection::Statuses, status_id)?
            .map(StatusUpdate::from_document)
            .transpose()
            .map_err(StoreError::from)
    }

    /// Number of statuses owned by `user_id`
    pub fn count_for_user(&self, user_id: &str) -> Result<u64> {
        self.store
            .count(Collection::Statuses, &Filter::eq("user_id", user_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;
    use socnet_common::UserAccount;

    fn store_with_dave() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        UserAccounts::new(&store)
            .add_user(&UserAccount::new("dave03", "david.yuen@gmail.com", "David", "Yuen"))
            .unwrap();
        store
    }

    #[test]
    fn test_add_status() {
        let store = store_with_dave();
        let statuses = StatusUpdates::new(&store);
        let sunny = StatusUpdate::new("dave03_00001", "dave03", "Sunny in Seattle this morning");

        statuses.add_status(&sunny).unwrap();
        assert!(statuses.add_status(&sunny).unwrap_err().is_duplicate_key());
        assert_eq!(statuses.len().unwrap(), 1);
        assert_eq!(statuses.count_for_user("dave03").unwrap(), 1);
    }

    #[test]
    fn test_add_status_requires_owner() {
        let store = store_with_dave();
        let statuses = StatusUpdates::new(&store);

        let err = statuses
            .add_status(&StatusUpdate::new("ghost_00001", "ghost", "boo"))
            .unwrap_err();
        assert!(matches!(err, StoreError::OwnerNotFound { .. }));
        assert!(statuses.is_empty().unwrap());
    }

    #[test]
    fn test_update_status() {
        let store = store_with_dave();
        let statuses = StatusUpdates::new(&store);
        statuses
            .add_status(&StatusUpdate::new("dave03_00001", "dave03", "Test update status"))
            .unwrap();

        statuses
            .update_status("dave03_00001", "dave03", "OK update status")
            .unwrap();
        assert_eq!(
            statuses.search_status("dave03_00001").unwrap().unwrap().status_text,
            "OK update status"
        );

        let err = statuses
            .update_status("bbq_00001", "dave03", "Fail update status")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_delete_and_search_status() {
        let store = store_with_dave();
        let statuses = StatusUpdates::new(&store);
        statuses
            .add_status(&StatusUpdate::new("dave03_00002", "dave03", "Test delete status"))
            .unwrap();

        statuses.delete_status("dave03_00002").unwrap();
        assert!(statuses.search_status("dave03_00002").unwrap().is_none());
        assert!(statuses.delete_status("bb1_00001").is_err());
    }
}
