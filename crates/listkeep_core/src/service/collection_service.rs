//! Collection use-case service.
//!
//! # Invariants
//! - `create` is lenient: a blank name becomes [`DEFAULT_COLLECTION_NAME`].
//! - `update` is strict: a blank name is a validation error and the stored
//!   row is left untouched.
//! - Both paths enforce the 1..=100 character bound after trimming.

use super::{RepoResultExt, ServiceResult};
use crate::model::collection::{Collection, CollectionId, DEFAULT_COLLECTION_NAME};
use crate::model::{now_epoch_ms, validate_name};
use crate::repo::collection_repo::CollectionRepository;
use log::info;

pub struct CollectionService<R: CollectionRepository> {
    repo: R,
}

impl<R: CollectionRepository> CollectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All collections, newest first.
    pub fn list(&self) -> ServiceResult<Vec<Collection>> {
        self.repo.list_collections().for_op("collection.list")
    }

    /// Returns `None` for a missing id.
    pub fn get_by_id(&self, id: CollectionId) -> ServiceResult<Option<Collection>> {
        self.repo.get_collection(id).for_op("collection.get")
    }

    /// Creates a collection, substituting the default name for blank input.
    pub fn create(&self, name: &str) -> ServiceResult<Collection> {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_COLLECTION_NAME
        } else {
            trimmed
        };
        validate_name(name)?;

        let collection = Collection::new(name);
        self.repo
            .insert_collection(&collection)
            .for_op("collection.create")?;
        info!(
            "event=collection_create module=service status=ok id={}",
            collection.id
        );
        Ok(collection)
    }

    /// Renames a collection; blank names are rejected.
    pub fn update(&self, id: CollectionId, name: &str) -> ServiceResult<Collection> {
        let name = name.trim();
        validate_name(name)?;
        self.repo
            .rename_collection(id, name, now_epoch_ms())
            .for_op("collection.update")
    }

    /// Deletes a collection together with every record it owns.
    pub fn delete(&self, id: CollectionId) -> ServiceResult<()> {
        self.repo.delete_collection(id).for_op("collection.delete")?;
        info!("event=collection_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn count(&self) -> ServiceResult<u64> {
        self.repo.count_collections().for_op("collection.count")
    }
}
