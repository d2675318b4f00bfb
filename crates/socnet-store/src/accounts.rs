//! Typed operations on the user account collection

use crate::error::{Result, StoreError};
use crate::filter::Filter;
use crate::store::RecordStore;
use serde_json::json;
use socnet_common::{Collection, Document, Record, UserAccount};
use tracing::{debug, info};

/// User accounts backed by a [`RecordStore`]
pub struct UserAccounts<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> UserAccounts<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Number of accounts
    pub fn len(&self) -> Result<u64> {
        self.store.count(Collection::Users, &Filter::all())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Add one account; fails with `DuplicateKey` if the id is taken
    pub fn add_user(&self, user: &UserAccount) -> Result<()> {
        self.store
            .insert_one(Collection::Users, &user.to_document()?)?;
        debug!(user_id = %user.user_id, "User added");
        Ok(())
    }

    /// Replace email and names of an existing account; the id never changes
    pub fn update_user(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        last_name: &str,
    ) -> Result<()> {
        let set = to_set(json!({
            "email": email,
            "name": name,
            "last_name": last_name,
        }));

        match self.store.update_one(Collection::Users, user_id, &set)? {
            0 => Err(StoreError::NotFound {
                collection: Collection::Users,
                key: user_id.to_string(),
            }),
            _ => {
                info!(user_id = %user_id, "User information updated");
                Ok(())
            },
        }
    }

    /// Delete an account and every status it owns
    ///
    /// Statuses are removed first so a failure never leaves orphans behind.
    /// Returns the number of statuses removed.
    pub fn delete_user(&self, user_id: &str) -> Result<u64> {
        if !self.exists(user_id)? {
            return Err(StoreError::NotFound {
                collection: Collection::Users,
                key: user_id.to_string(),
            });
        }

        let statuses = self
            .store
            .delete_many(Collection::Statuses, &Filter::eq("user_id", user_id))?;
        self.store.delete_one(Collection::Users, user_id)?;

        info!(user_id = %user_id, statuses_removed = statuses, "User {} was deleted", user_id);
        Ok(statuses)
    }

    pub fn search_user(&self, user_id: &str) -> Result<Option<UserAccount>> {
        self.store
            .find_by_id(Collection::Users, user_id)?
            .map(UserAccount::from_document)
            .transpose()
            .map_err(StoreError::from)
    }

    /// Whether an account with this id exists
    pub fn exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.store.find_by_id(Collection::Users, user_id)?.is_some())
    }
}

pub(crate) fn to_set(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Document::new(),
    }
}
