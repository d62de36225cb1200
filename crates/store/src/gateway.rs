//! Content store gateway.
//!
//! The feed engine does not own its persistence. It talks to a document
//! store through this narrow interface: read a document together with its
//! revision marker, then write it back conditionally on that marker still
//! being current. Implementations must serialize writes per document.

use std::fmt;

use agora_common::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::ContentItem;

/// Opaque marker identifying the revision of a stored document.
///
/// Tokens are only ever compared for equality; their content carries no
/// meaning outside the store that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version(String);

impl Version {
    /// Wrap a raw token issued by a store.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document paired with the revision observed when it was read.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The document.
    pub value: T,
    /// Revision marker at read time.
    pub version: Version,
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write was applied; the document now carries the returned version.
    Applied(Version),
    /// The document changed since it was read; nothing was written.
    Conflict,
}

/// Transactional document interface the feed engine depends on.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read an item and its current version.
    async fn get(&self, item_id: &str) -> AppResult<Option<Versioned<ContentItem>>>;

    /// Insert a new item. Fails if the ID is already taken.
    async fn insert(&self, item: &ContentItem) -> AppResult<Version>;

    /// Write `item` back if the stored version still equals `expected`.
    async fn put_if_unchanged(
        &self,
        item: &ContentItem,
        expected: &Version,
    ) -> AppResult<PutOutcome>;

    /// Delete an item. Returns whether it existed.
    async fn delete(&self, item_id: &str) -> AppResult<bool>;
}
