//! Document store capability.
//!
//! A document store maps `collection/id` paths to JSON records. The page only
//! needs two operations: an existence read and an atomic multi-document batch.
//!
//! - `memory.rs`: in-process store (tests, `--ephemeral`)
//! - `json_file.rs`: store persisted to a single JSON file

mod json_file;
mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::error::StoreError;

/// Collection holding one document per claimed username.
pub const USERNAMES: &str = "usernames";

/// Collection holding one document per user id.
pub const USERS: &str = "users";

/// Address of a single document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(String);

impl DocPath {
    /// Builds a path from a collection and a document id.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidPath` if either segment is empty or contains `/`.
    pub fn new(collection: &str, id: &str) -> Result<Self, StoreError> {
        let valid = |segment: &str| !segment.is_empty() && !segment.contains('/');
        if !valid(collection) || !valid(id) {
            return Err(StoreError::InvalidPath(format!("{collection}/{id}")));
        }
        Ok(Self(format!("{collection}/{id}")))
    }

    /// Path of the document reserving `username`.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidPath` for an empty username.
    pub fn username(username: &str) -> Result<Self, StoreError> {
        Self::new(USERNAMES, username)
    }

    /// Path of the profile document for `user_id`.
    ///
    /// # Errors
    /// Returns `StoreError::InvalidPath` for an empty user id.
    pub fn user(user_id: &str) -> Result<Self, StoreError> {
        Self::new(USERS, user_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a document read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub exists: bool,
    pub data: Option<Value>,
}

impl Snapshot {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn found(data: Value) -> Self {
        Self {
            exists: true,
            data: Some(data),
        }
    }

    /// Deserializes the document body, if present.
    ///
    /// # Errors
    /// Returns `StoreError::Serialization` if the body does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        match &self.data {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Create or overwrite the document.
    Set { path: DocPath, data: Value },
    /// Create the document; the whole batch fails if it already exists.
    Create { path: DocPath, data: Value },
}

impl Write {
    pub fn path(&self) -> &DocPath {
        match self {
            Write::Set { path, .. } | Write::Create { path, .. } => path,
        }
    }
}

/// Builder for an atomic multi-document write.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an overwrite of `path` with `data`.
    ///
    /// # Errors
    /// Returns `StoreError::Serialization` if `data` cannot be encoded.
    pub fn set<T: Serialize>(&mut self, path: DocPath, data: &T) -> Result<&mut Self, StoreError> {
        let data = serde_json::to_value(data)?;
        self.writes.push(Write::Set { path, data });
        Ok(self)
    }

    /// Queues a create-only write of `path` with `data`.
    ///
    /// # Errors
    /// Returns `StoreError::Serialization` if `data` cannot be encoded.
    pub fn create<T: Serialize>(
        &mut self,
        path: DocPath,
        data: &T,
    ) -> Result<&mut Self, StoreError> {
        let data = serde_json::to_value(data)?;
        self.writes.push(Write::Create { path, data });
        Ok(self)
    }

    /// Commits every queued write as one all-or-nothing operation.
    ///
    /// # Errors
    /// Propagates the store's failure; no write is applied in that case.
    pub async fn commit(self, store: &dyn DocumentStore) -> Result<(), StoreError> {
        store.batch_write(self.writes).await
    }
}

/// Key-addressed document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document.
    async fn get_document(&self, path: &DocPath) -> Result<Snapshot, StoreError>;

    /// Applies every write or none of them.
    async fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError>;

    /// Revision counter, bumped after every successful commit.
    fn watch(&self) -> watch::Receiver<u64>;
}

/// In-memory document map with all-or-nothing batch semantics.
///
/// Shared by the store implementations; serializes as a flat
/// `{ "collection/id": {...} }` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Documents {
    docs: BTreeMap<String, Value>,
}

impl Documents {
    pub fn get(&self, path: &DocPath) -> Snapshot {
        self.docs
            .get(path.as_str())
            .cloned()
            .map_or_else(Snapshot::missing, Snapshot::found)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Validates all preconditions, then applies every write.
    ///
    /// # Errors
    /// Returns `StoreError::AlreadyExists` if any create-only write targets an
    /// existing document (or one created earlier in the same batch). Nothing is
    /// applied in that case.
    pub fn apply(&mut self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut created: Vec<&str> = Vec::new();
        for write in &writes {
            if let Write::Create { path, .. } = write {
                if self.docs.contains_key(path.as_str()) || created.contains(&path.as_str()) {
                    return Err(StoreError::AlreadyExists(path.to_string()));
                }
                created.push(path.as_str());
            }
        }

        for write in writes {
            match write {
                Write::Set { path, data } | Write::Create { path, data } => {
                    self.docs.insert(path.0, data);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_doc_path_rejects_nested_or_empty_segments() {
        assert!(DocPath::new("usernames", "").is_err());
        assert!(DocPath::new("", "alice").is_err());
        assert!(DocPath::new("usernames", "a/b").is_err());
        assert_eq!(
            DocPath::new("usernames", "alice").unwrap(),
            DocPath::username("alice").unwrap()
        );
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut docs = Documents::default();
        docs.apply(vec![Write::Set {
            path: DocPath::username("alice").unwrap(),
            data: json!({"ownerId": "u1"}),
        }])
        .unwrap();

        let result = docs.apply(vec![
            Write::Set {
                path: DocPath::user("u2").unwrap(),
                data: json!({"username": "alice"}),
            },
            Write::Create {
                path: DocPath::username("alice").unwrap(),
                data: json!({"ownerId": "u2"}),
            },
        ]);

        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert!(!docs.get(&DocPath::user("u2").unwrap()).exists);
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_duplicate_create_in_one_batch_fails() {
        let mut docs = Documents::default();
        let path = DocPath::username("bob").unwrap();
        let result = docs.apply(vec![
            Write::Create {
                path: path.clone(),
                data: json!({}),
            },
            Write::Create {
                path,
                data: json!({}),
            },
        ]);
        assert!(result.is_err());
        assert!(docs.is_empty());
    }

    #[test]
    fn test_snapshot_data_as() {
        #[derive(Deserialize)]
        struct Owner {
            #[serde(rename = "ownerId")]
            owner_id: String,
        }

        let snapshot = Snapshot::found(json!({"ownerId": "u1"}));
        let owner: Owner = snapshot.data_as().unwrap().unwrap();
        assert_eq!(owner.owner_id, "u1");
        assert!(Snapshot::missing().data_as::<Owner>().unwrap().is_none());
    }
}
