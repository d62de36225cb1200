//! View counter service.

use agora_common::AppResult;
use agora_store::entities::ContentItem;
use agora_store::ContentItemRepository;

/// View counter service.
#[derive(Clone)]
pub struct ViewService {
    repo: ContentItemRepository,
}

impl ViewService {
    /// Create a new view service.
    #[must_use]
    pub const fn new(repo: ContentItemRepository) -> Self {
        Self { repo }
    }

    /// Record one view on an item.
    ///
    /// Every call increments the counter, including repeat calls from the
    /// same viewer; deduplication is the calling boundary's concern. The
    /// increment goes through the conditional-write protocol, so concurrent
    /// views never lose updates.
    pub async fn increment(&self, item_id: &str) -> AppResult<ContentItem> {
        self.repo
            .mutate(item_id, |item| {
                item.views += 1;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_common::AppError;
    use agora_store::entities::{ContentBody, TextBody};
    use agora_store::{ContentStore, MemoryContentStore};
    use chrono::Utc;
    use std::sync::Arc;

    fn create_test_item(id: &str, views: u64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            created_by: "author1".to_string(),
            reactions: vec![],
            views,
            body: ContentBody::Text(TextBody {
                text: "Test post".to_string(),
            }),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_increment_not_found() {
        let store = Arc::new(MemoryContentStore::new());
        let service = ViewService::new(ContentItemRepository::new(store));

        let result = service.increment("nonexistent").await;
        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_increment_counts_every_call() {
        let store = Arc::new(MemoryContentStore::new());
        store.insert(&create_test_item("item1", 7)).await.unwrap();
        let service = ViewService::new(ContentItemRepository::new(store));

        let item = service.increment("item1").await.unwrap();
        assert_eq!(item.views, 8);

        // No viewer-level dedup: the same caller increments again.
        let item = service.increment("item1").await.unwrap();
        assert_eq!(item.views, 9);
    }
}
