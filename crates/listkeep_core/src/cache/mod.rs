//! Reactive cache layer for screens that mirror service lists.
//!
//! Each screen owns one cache per list it shows. Mutations are applied to
//! the cache first and reconciled or rolled back once storage answers.

mod collection_cache;
mod list_cache;
mod record_cache;

pub use collection_cache::CollectionListCache;
pub use list_cache::{CacheEntry, CacheSnapshot, CacheState, ListCache};
pub use record_cache::RecordListCache;

use crate::model::collection::Collection;
use crate::model::record::Record;
use uuid::Uuid;

impl CacheEntry for Collection {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

impl CacheEntry for Record {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}
