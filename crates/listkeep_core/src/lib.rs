//! Offline-first storage core for named lists and their entries.
//!
//! Layers, leaves first: `db` (schema, migrations, connection context),
//! `model`, `repo` (SQL), `service` (validation and error kinds) and `cache`
//! (optimistic list mirrors for UI screens).

pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use cache::{CacheEntry, CacheSnapshot, CacheState, CollectionListCache, ListCache, RecordListCache};
pub use config::{LogConfig, StoreConfig};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::collection::{Collection, CollectionId, DEFAULT_COLLECTION_NAME};
pub use model::preferences::{
    ColorOverrides, Preferences, CUSTOM_SELECTION_ID, DEFAULT_SELECTION_ID,
};
pub use model::record::{Record, RecordId};
pub use model::{EntityKind, ValidationError};
pub use repo::collection_repo::{CollectionRepository, SqliteCollectionRepository};
pub use repo::preference_repo::{PreferenceRepository, SqlitePreferenceRepository};
pub use repo::record_repo::{RecordRepository, SqliteRecordRepository};
pub use repo::{RepoError, RepoResult};
pub use service::collection_service::CollectionService;
pub use service::preference_service::PreferenceService;
pub use service::record_service::RecordService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
