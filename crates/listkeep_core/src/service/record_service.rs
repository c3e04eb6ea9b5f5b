//! Record use-case service.
//!
//! # Invariants
//! - Text is trimmed and must be 1..=500 characters on create and update;
//!   there is no default substitution.
//! - `create` requires an existing owning collection.
//! - `copy` re-uses already-stored text verbatim and skips validation.

use super::{RepoResultExt, ServiceResult};
use crate::model::collection::CollectionId;
use crate::model::record::{Record, RecordId};
use crate::model::{now_epoch_ms, validate_record_text};
use crate::repo::record_repo::RecordRepository;
use log::{debug, info};

pub struct RecordService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records of one collection, oldest first. Empty for an unknown collection.
    pub fn list_by_collection(&self, collection_id: CollectionId) -> ServiceResult<Vec<Record>> {
        self.repo
            .list_by_collection(collection_id)
            .for_op("record.list")
    }

    pub fn get_by_id(&self, id: RecordId) -> ServiceResult<Option<Record>> {
        self.repo.get_record(id).for_op("record.get")
    }

    pub fn create(&self, collection_id: CollectionId, text: &str) -> ServiceResult<Record> {
        let text = text.trim();
        validate_record_text(text)?;

        let record = Record::new(collection_id, text);
        self.repo.insert_record(&record).for_op("record.create")?;
        debug!(
            "event=record_create module=service status=ok id={} collection_id={}",
            record.id, collection_id
        );
        Ok(record)
    }

    pub fn update(&self, id: RecordId, text: &str) -> ServiceResult<Record> {
        let text = text.trim();
        validate_record_text(text)?;
        self.repo
            .update_text(id, text, now_epoch_ms())
            .for_op("record.update")
    }

    /// Duplicates a record within its collection.
    pub fn copy(&self, id: RecordId) -> ServiceResult<Record> {
        let copy = self.repo.copy_record(id).for_op("record.copy")?;
        debug!(
            "event=record_copy module=service status=ok source_id={} id={}",
            id, copy.id
        );
        Ok(copy)
    }

    /// Flips `completed` and advances `updated_at`.
    pub fn toggle_complete(&self, id: RecordId) -> ServiceResult<Record> {
        self.repo
            .toggle_completed(id, now_epoch_ms())
            .for_op("record.toggle_complete")
    }

    pub fn delete(&self, id: RecordId) -> ServiceResult<()> {
        self.repo.delete_record(id).for_op("record.delete")
    }

    pub fn count_by_collection(&self, collection_id: CollectionId) -> ServiceResult<u64> {
        self.repo
            .count_by_collection(collection_id)
            .for_op("record.count")
    }

    /// Removes every record of a collection and returns how many were deleted.
    ///
    /// Collection deletion already cascades; this is a manual cleanup path.
    pub fn delete_by_collection(&self, collection_id: CollectionId) -> ServiceResult<u64> {
        let deleted = self
            .repo
            .delete_by_collection(collection_id)
            .for_op("record.delete_by_collection")?;
        info!(
            "event=record_bulk_delete module=service status=ok collection_id={} deleted={}",
            collection_id, deleted
        );
        Ok(deleted)
    }
}
