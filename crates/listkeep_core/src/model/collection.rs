//! Collection: a named group that owns its records.
//!
//! # Invariants
//! - `id` is generated once and never changes.
//! - Deleting a collection deletes every record it owns (store-level cascade).

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CollectionId = Uuid;

/// Name substituted when a collection is created with blank input.
pub const DEFAULT_COLLECTION_NAME: &str = "Untitled list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, never earlier than `created_at`.
    pub updated_at: i64,
}

impl Collection {
    /// Builds an unsaved collection with a fresh id and current timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Renames and advances `updated_at` without moving it backwards.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = self.updated_at.max(now_epoch_ms());
    }
}
