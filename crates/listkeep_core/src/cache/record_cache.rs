//! Cached, entry-ordered record list of one collection bound to a
//! [`RecordService`].

use super::list_cache::{remove_entry, replace_or_push, update_entry, CacheState, ListCache};
use super::CacheSnapshot;
use crate::model::collection::CollectionId;
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::RecordRepository;
use crate::service::record_service::RecordService;
use crate::service::ServiceResult;

pub struct RecordListCache<'s, R: RecordRepository> {
    service: &'s RecordService<R>,
    collection_id: CollectionId,
    cache: ListCache<Record>,
}

impl<'s, R: RecordRepository> RecordListCache<'s, R> {
    pub fn new(service: &'s RecordService<R>, collection_id: CollectionId) -> Self {
        Self {
            service,
            collection_id,
            cache: ListCache::new("records"),
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn state(&self) -> &CacheState {
        self.cache.state()
    }

    pub fn items(&self) -> &[Record] {
        self.cache.items()
    }

    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CacheSnapshot<'_, Record>) + 'static) {
        self.cache.subscribe(listener);
    }

    pub fn refresh(&mut self) -> ServiceResult<()> {
        let service = self.service;
        let collection_id = self.collection_id;
        self.cache
            .refresh(|| service.list_by_collection(collection_id))
    }

    pub fn create(&mut self, text: &str) -> ServiceResult<Record> {
        let service = self.service;
        let collection_id = self.collection_id;
        let placeholder = Record::new(collection_id, text.trim());
        let placeholder_id = placeholder.id;

        self.cache.mutate(
            "create",
            |items| items.push(placeholder),
            || service.create(collection_id, text),
            |items, created| replace_or_push(items, placeholder_id, created),
        )
    }

    pub fn update(&mut self, id: RecordId, text: &str) -> ServiceResult<Record> {
        let service = self.service;
        let trimmed = text.trim().to_string();

        self.cache.mutate(
            "update",
            |items| update_entry(items, id, |record| record.set_text(trimmed)),
            || service.update(id, text),
            |items, updated: &Record| update_entry(items, id, |entry| *entry = updated.clone()),
        )
    }

    pub fn copy(&mut self, id: RecordId) -> ServiceResult<Record> {
        let service = self.service;
        let placeholder = self.cache.get(id).map(Record::duplicate);
        let placeholder_id = placeholder.as_ref().map(|record| record.id);

        self.cache.mutate(
            "copy",
            |items| items.extend(placeholder),
            || service.copy(id),
            |items, copied: &Record| replace_or_push(items, placeholder_id.unwrap_or(copied.id), copied),
        )
    }

    pub fn toggle_complete(&mut self, id: RecordId) -> ServiceResult<Record> {
        let service = self.service;
        self.cache.mutate(
            "toggle_complete",
            |items| update_entry(items, id, Record::toggle),
            || service.toggle_complete(id),
            |items, toggled: &Record| update_entry(items, id, |entry| *entry = toggled.clone()),
        )
    }

    pub fn delete(&mut self, id: RecordId) -> ServiceResult<()> {
        let service = self.service;
        self.cache.mutate(
            "delete",
            |items| remove_entry(items, id),
            || service.delete(id),
            |_, _| {},
        )
    }
}
