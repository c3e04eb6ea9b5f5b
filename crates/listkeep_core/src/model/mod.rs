//! Domain model for collections, their records and the preferences row.
//!
//! # Responsibility
//! - Define the entities exchanged between storage, services and caches.
//! - Own field validation shared by every write path.
//!
//! # Invariants
//! - Ids are random v4 UUIDs and never reused.
//! - `updated_at >= created_at` for every entity.

pub mod collection;
pub mod preferences;
pub mod record;
mod validate;

pub use validate::{validate_name, validate_record_text, ValidationError};

use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entity named by not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Collection,
    Record,
    Preferences,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Collection => "collection",
            Self::Record => "record",
            Self::Preferences => "preferences",
        })
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
