//! Record: one entry owned by exactly one collection.
//!
//! # Invariants
//! - `collection_id` is fixed at creation; records never move.
//! - `completed` starts as `false`.

use super::collection::CollectionId;
use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RecordId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub collection_id: CollectionId,
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Record {
    pub fn new(collection_id: CollectionId, text: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            collection_id,
            text: text.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sibling with the same text and completion state, new id and timestamps.
    pub fn duplicate(&self) -> Self {
        Self {
            completed: self.completed,
            ..Self::new(self.collection_id, self.text.clone())
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch();
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = self.updated_at.max(now_epoch_ms());
    }
}
