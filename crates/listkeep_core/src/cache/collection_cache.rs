//! Cached, newest-first collection list bound to a [`CollectionService`].

use super::list_cache::{remove_entry, replace_or_prepend, update_entry, CacheState, ListCache};
use super::CacheSnapshot;
use crate::model::collection::{Collection, CollectionId, DEFAULT_COLLECTION_NAME};
use crate::repo::collection_repo::CollectionRepository;
use crate::service::collection_service::CollectionService;
use crate::service::ServiceResult;

pub struct CollectionListCache<'s, R: CollectionRepository> {
    service: &'s CollectionService<R>,
    cache: ListCache<Collection>,
}

impl<'s, R: CollectionRepository> CollectionListCache<'s, R> {
    /// Creates an idle cache; call [`Self::refresh`] to load it.
    pub fn new(service: &'s CollectionService<R>) -> Self {
        Self {
            service,
            cache: ListCache::new("collections"),
        }
    }

    pub fn state(&self) -> &CacheState {
        self.cache.state()
    }

    pub fn items(&self) -> &[Collection] {
        self.cache.items()
    }

    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CacheSnapshot<'_, Collection>) + 'static) {
        self.cache.subscribe(listener);
    }

    pub fn refresh(&mut self) -> ServiceResult<()> {
        let service = self.service;
        self.cache.refresh(|| service.list())
    }

    pub fn create(&mut self, name: &str) -> ServiceResult<Collection> {
        let service = self.service;
        let trimmed = name.trim();
        let placeholder = Collection::new(if trimmed.is_empty() {
            DEFAULT_COLLECTION_NAME
        } else {
            trimmed
        });
        let placeholder_id = placeholder.id;

        self.cache.mutate(
            "create",
            |items| items.insert(0, placeholder),
            || service.create(name),
            |items, created| replace_or_prepend(items, placeholder_id, created),
        )
    }

    pub fn update(&mut self, id: CollectionId, name: &str) -> ServiceResult<Collection> {
        let service = self.service;
        let trimmed = name.trim().to_string();

        self.cache.mutate(
            "update",
            |items| update_entry(items, id, |collection| collection.rename(trimmed)),
            || service.update(id, name),
            |items, updated: &Collection| update_entry(items, id, |entry| *entry = updated.clone()),
        )
    }

    pub fn delete(&mut self, id: CollectionId) -> ServiceResult<()> {
        let service = self.service;
        self.cache.mutate(
            "delete",
            |items| remove_entry(items, id),
            || service.delete(id),
            |_, _| {},
        )
    }
}
