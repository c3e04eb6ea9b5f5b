//! Optimistic in-memory mirror of one service list.
//!
//! # Responsibility
//! - Track `Idle -> Loading -> Ready | Failed` for a cached list.
//! - Apply mutations locally before the storage call, then reconcile with
//!   the returned entity or restore the pre-mutation snapshot.
//!
//! # Invariants
//! - A failed mutation leaves `items` equal to the snapshot taken before it.
//! - `refresh` replaces `items` wholesale; optimistic state is never merged.
//! - Mutating methods take `&mut self`, so at most one mutation per list is in
//!   flight.
//! - `generation` increases on every visible change.

use crate::service::{ServiceError, ServiceResult};
use log::{debug, warn};
use uuid::Uuid;

/// Entity that can live in a [`ListCache`].
pub trait CacheEntry: Clone + PartialEq {
    fn entry_id(&self) -> Uuid;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Idle,
    Loading,
    Ready,
    /// Last refresh failed; `items` still holds the previous snapshot.
    Failed(String),
}

/// View handed to listeners after each change.
#[derive(Debug)]
pub struct CacheSnapshot<'a, T> {
    pub state: &'a CacheState,
    pub items: &'a [T],
    pub generation: u64,
}

type Listener<T> = Box<dyn FnMut(&CacheSnapshot<'_, T>)>;

pub struct ListCache<T> {
    kind: &'static str,
    state: CacheState,
    items: Vec<T>,
    generation: u64,
    listeners: Vec<Listener<T>>,
}

impl<T: CacheEntry> ListCache<T> {
    /// `kind` labels log events, e.g. `collections`.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            state: CacheState::Idle,
            items: Vec::new(),
            generation: 0,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.entry_id() == id)
    }

    /// Registers a listener called after every visible change.
    pub fn subscribe(&mut self, listener: impl FnMut(&CacheSnapshot<'_, T>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Reloads the whole list, discarding any optimistic state.
    pub fn refresh(
        &mut self,
        load: impl FnOnce() -> ServiceResult<Vec<T>>,
    ) -> ServiceResult<()> {
        self.state = CacheState::Loading;
        self.publish();

        match load() {
            Ok(items) => {
                self.items = items;
                self.state = CacheState::Ready;
                debug!(
                    "event=cache_refresh module=cache status=ok kind={} items={}",
                    self.kind,
                    self.items.len()
                );
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.state = CacheState::Failed(err.to_string());
                warn!(
                    "event=cache_refresh module=cache status=error kind={} error={}",
                    self.kind, err
                );
                self.publish();
                Err(err)
            }
        }
    }

    /// Runs one optimistic mutation.
    ///
    /// `optimistic` edits the cached items, `call` performs the storage
    /// operation and `reconcile` folds its result back in. When `call` fails
    /// the snapshot is restored and the error returned unchanged.
    pub fn mutate<O>(
        &mut self,
        operation: &'static str,
        optimistic: impl FnOnce(&mut Vec<T>),
        call: impl FnOnce() -> ServiceResult<O>,
        reconcile: impl FnOnce(&mut Vec<T>, &O),
    ) -> ServiceResult<O> {
        let snapshot = self.items.clone();
        optimistic(&mut self.items);
        self.publish();

        match call() {
            Ok(output) => {
                reconcile(&mut self.items, &output);
                self.publish();
                Ok(output)
            }
            Err(err) => {
                self.rollback(operation, snapshot, &err);
                Err(err)
            }
        }
    }

    fn rollback(&mut self, operation: &'static str, snapshot: Vec<T>, err: &ServiceError) {
        self.items = snapshot;
        warn!(
            "event=cache_rollback module=cache status=ok kind={} op={} recoverable={} error={}",
            self.kind,
            operation,
            err.is_recoverable(),
            err
        );
        self.publish();
    }

    fn publish(&mut self) {
        self.generation += 1;
        let snapshot = CacheSnapshot {
            state: &self.state,
            items: &self.items,
            generation: self.generation,
        };
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

/// Replaces the entry with `id` by `entry`; appends when `id` is absent.
pub(crate) fn replace_or_push<T: CacheEntry>(items: &mut Vec<T>, id: Uuid, entry: &T) {
    match items.iter().position(|item| item.entry_id() == id) {
        Some(index) => items[index] = entry.clone(),
        None => items.push(entry.clone()),
    }
}

/// Replaces the entry with `id` by `entry`; inserts at the front when absent.
pub(crate) fn replace_or_prepend<T: CacheEntry>(items: &mut Vec<T>, id: Uuid, entry: &T) {
    match items.iter().position(|item| item.entry_id() == id) {
        Some(index) => items[index] = entry.clone(),
        None => items.insert(0, entry.clone()),
    }
}

pub(crate) fn update_entry<T: CacheEntry>(items: &mut [T], id: Uuid, edit: impl FnOnce(&mut T)) {
    if let Some(item) = items.iter_mut().find(|item| item.entry_id() == id) {
        edit(item);
    }
}

pub(crate) fn remove_entry<T: CacheEntry>(items: &mut Vec<T>, id: Uuid) {
    items.retain(|item| item.entry_id() != id);
}
