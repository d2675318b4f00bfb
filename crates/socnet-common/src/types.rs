//! Domain types for user accounts and status updates
//!
//! Records are persisted as JSON documents. The record's identity is stored
//! under [`ID_FIELD`], which is the primary key of its collection.

use crate::error::{Result, SocnetError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Field holding a document's primary key
pub const ID_FIELD: &str = "_id";

/// A schemaless document as stored in a collection
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The two collections of the social network database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// User accounts, keyed by `user_id`
    Users,
    /// Status updates, keyed by `status_id`
    Statuses,
}

impl Collection {
    /// Storage name of the collection
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "user_collection",
            Collection::Statuses => "status_collection",
        }
    }

    /// Name of the source id column, used when reporting failed keys
    pub fn key_name(&self) -> &'static str {
        match self {
            Collection::Users => "user_id",
            Collection::Statuses => "status_id",
        }
    }

    /// Every collection, in dependency order (owners first)
    pub fn all() -> [Collection; 2] {
        [Collection::Users, Collection::Statuses]
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record that maps onto a document in a fixed collection
pub trait Record: Serialize + DeserializeOwned {
    /// Collection the record is stored in
    const COLLECTION: Collection;

    /// Primary key value
    fn key(&self) -> &str;

    /// Convert into the stored document shape
    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(SocnetError::NotADocument(other.to_string())),
        }
    }

    /// Rebuild the record from a stored document
    fn from_document(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique account id (primary key)
    #[serde(rename = "_id")]
    pub user_id: String,

    pub email: String,

    pub name: String,

    pub last_name: String,
}

impl UserAccount {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Record for UserAccount {
    const COLLECTION: Collection = Collection::Users;

    fn key(&self) -> &str {
        &self.user_id
    }
}

/// A status message posted by a user
///
/// `user_id` is a denormalized copy of the owner's id. It is checked against
/// the user collection when the status is created and never afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Unique status id (primary key)
    #[serde(rename = "_id")]
    pub status_id: String,

    /// Owning account
    pub user_id: String,

    pub status_text: String,
}

impl StatusUpdate {
    pub fn new(
        status_id: impl Into<String>,
        user_id: impl Into<String>,
        status_text: impl Into<String>,
    ) -> Self {
        Self {
            status_id: status_id.into(),
            user_id: user_id.into(),
            status_text: status_text.into(),
        }
    }
}

impl Record for StatusUpdate {
    const COLLECTION: Collection = Collection::Statuses;

    fn key(&self) -> &str {
        &self.status_id
    }
}
