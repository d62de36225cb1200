//! Content item repository.
//!
//! Wraps the store gateway with the read, transform, conditional-write
//! cycle shared by every feed mutation. An error from the transform aborts
//! the cycle before any write and is surfaced unchanged; only store-level
//! write conflicts are retried, up to a bounded ceiling.

use std::sync::Arc;

use agora_common::{AppError, AppResult};
use chrono::Utc;

use crate::entities::ContentItem;
use crate::gateway::{ContentStore, PutOutcome, Versioned};

/// Default ceiling on read-transform-write attempts for one mutation.
pub const DEFAULT_MAX_MUTATION_ATTEMPTS: u32 = 5;

/// Content item repository for store operations.
#[derive(Clone)]
pub struct ContentItemRepository {
    store: Arc<dyn ContentStore>,
    max_attempts: u32,
}

impl ContentItemRepository {
    /// Create a new repository with the default retry ceiling.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_MUTATION_ATTEMPTS,
        }
    }

    /// Create a repository with a custom retry ceiling (minimum 1).
    #[must_use]
    pub fn with_max_attempts(store: Arc<dyn ContentStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Find an item by ID.
    pub async fn find(&self, item_id: &str) -> AppResult<Option<ContentItem>> {
        Ok(self.store.get(item_id).await?.map(|v| v.value))
    }

    /// Get an item by ID.
    pub async fn get(&self, item_id: &str) -> AppResult<ContentItem> {
        self.find(item_id)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))
    }

    /// Insert a newly created item.
    pub async fn create(&self, item: &ContentItem) -> AppResult<()> {
        self.store.insert(item).await?;
        Ok(())
    }

    /// Delete an item by ID.
    pub async fn delete(&self, item_id: &str) -> AppResult<()> {
        if self.store.delete(item_id).await? {
            Ok(())
        } else {
            Err(AppError::ItemNotFound(item_id.to_string()))
        }
    }

    /// Apply `transform` to the current document and write the result back.
    ///
    /// The transform must be pure: it is re-run from a fresh read whenever
    /// the conditional write loses to a concurrent writer. After the retry
    /// ceiling is exhausted the mutation fails with
    /// [`AppError::ConcurrencyConflict`].
    pub async fn mutate<F>(&self, item_id: &str, mut transform: F) -> AppResult<ContentItem>
    where
        F: FnMut(&mut ContentItem) -> AppResult<()> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let Versioned {
                value: mut item,
                version,
            } = self
                .store
                .get(item_id)
                .await?
                .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

            transform(&mut item)?;
            item.updated_at = Some(Utc::now());

            match self.store.put_if_unchanged(&item, &version).await? {
                PutOutcome::Applied(_) => return Ok(item),
                PutOutcome::Conflict => {
                    tracing::debug!(
                        item_id = %item_id,
                        attempt,
                        max_attempts = self.max_attempts,
                        "write conflict, retrying mutation"
                    );
                }
            }
        }

        tracing::warn!(
            item_id = %item_id,
            max_attempts = self.max_attempts,
            "mutation retry ceiling exhausted"
        );
        Err(AppError::ConcurrencyConflict(item_id.to_string()))
    }
}
