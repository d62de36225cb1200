//! In-memory content store.
//!
//! Backs unit tests and local development. Mirrors the conditional-write
//! semantics of a managed document store: every write issues a fresh
//! revision token, and a conditional put only applies when the caller read
//! the current revision. A put against a deleted document reports a
//! conflict, so a racing mutation re-reads and surfaces the missing item.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use agora_common::{AppError, AppResult, IdGenerator};
use async_trait::async_trait;

use crate::entities::ContentItem;
use crate::gateway::{ContentStore, PutOutcome, Version, Versioned};

type ItemMap = HashMap<String, Versioned<ContentItem>>;

/// In-memory [`ContentStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    items: RwLock<ItemMap>,
    id_gen: IdGenerator,
}

impl MemoryContentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read_items()?.len())
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.read_items()?.is_empty())
    }

    fn read_items(&self) -> AppResult<RwLockReadGuard<'_, ItemMap>> {
        self.items
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned".to_string()))
    }

    fn write_items(&self) -> AppResult<RwLockWriteGuard<'_, ItemMap>> {
        self.items
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned".to_string()))
    }

    fn next_version(&self) -> Version {
        Version::new(self.id_gen.generate_token())
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get(&self, item_id: &str) -> AppResult<Option<Versioned<ContentItem>>> {
        Ok(self.read_items()?.get(item_id).cloned())
    }

    async fn insert(&self, item: &ContentItem) -> AppResult<Version> {
        let mut items = self.write_items()?;

        if items.contains_key(&item.id) {
            return Err(AppError::Store(format!("item already exists: {}", item.id)));
        }

        let version = self.next_version();
        items.insert(
            item.id.clone(),
            Versioned {
                value: item.clone(),
                version: version.clone(),
            },
        );
        Ok(version)
    }

    async fn put_if_unchanged(
        &self,
        item: &ContentItem,
        expected: &Version,
    ) -> AppResult<PutOutcome> {
        let mut items = self.write_items()?;

        // A missing entry means the document was deleted since the read;
        // that is a conflict, not an implicit re-insert.
        let Some(current) = items.get(&item.id) else {
            return Ok(PutOutcome::Conflict);
        };

        if current.version != *expected {
            return Ok(PutOutcome::Conflict);
        }

        let version = self.next_version();
        items.insert(
            item.id.clone(),
            Versioned {
                value: item.clone(),
                version: version.clone(),
            },
        );
        Ok(PutOutcome::Applied(version))
    }

    async fn delete(&self, item_id: &str) -> AppResult<bool> {
        Ok(self.write_items()?.remove(item_id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{ContentBody, TextBody};
    use chrono::Utc;

    fn text_item(id: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            created_by: "user1".to_string(),
            reactions: vec![],
            views: 0,
            body: ContentBody::Text(TextBody {
                text: "hello".to_string(),
            }),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryContentStore::new();
        let item = text_item("item1");

        let version = store.insert(&item).await.unwrap();

        let read = store.get("item1").await.unwrap().unwrap();
        assert_eq!(read.value, item);
        assert_eq!(read.version, version);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_fails() {
        let store = MemoryContentStore::new();
        let item = text_item("item1");

        store.insert(&item).await.unwrap();
        let result = store.insert(&item).await;

        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_conditional_put_applies_with_current_version() {
        let store = MemoryContentStore::new();
        let mut item = text_item("item1");
        let version = store.insert(&item).await.unwrap();

        item.views = 1;
        let outcome = store.put_if_unchanged(&item, &version).await.unwrap();

        let PutOutcome::Applied(new_version) = outcome else {
            panic!("expected Applied");
        };
        assert_ne!(new_version, version);

        let read = store.get("item1").await.unwrap().unwrap();
        assert_eq!(read.value.views, 1);
        assert_eq!(read.version, new_version);
    }

    #[tokio::test]
    async fn test_conditional_put_conflicts_on_stale_version() {
        let store = MemoryContentStore::new();
        let mut item = text_item("item1");
        let stale = store.insert(&item).await.unwrap();

        // Another writer advances the document.
        item.views = 1;
        store.put_if_unchanged(&item, &stale).await.unwrap();

        item.views = 2;
        let outcome = store.put_if_unchanged(&item, &stale).await.unwrap();
        assert_eq!(outcome, PutOutcome::Conflict);

        // The losing write left no trace.
        let read = store.get("item1").await.unwrap().unwrap();
        assert_eq!(read.value.views, 1);
    }

    #[tokio::test]
    async fn test_conditional_put_conflicts_after_delete() {
        let store = MemoryContentStore::new();
        let item = text_item("item1");
        let version = store.insert(&item).await.unwrap();

        assert!(store.delete("item1").await.unwrap());

        let outcome = store.put_if_unchanged(&item, &version).await.unwrap();
        assert_eq!(outcome, PutOutcome::Conflict);
        assert!(store.get("item1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = MemoryContentStore::new();
        assert!(!store.delete("nonexistent").await.unwrap());
    }
}
