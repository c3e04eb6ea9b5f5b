//! Use-case services in front of the repositories.
//!
//! # Responsibility
//! - Validate input before any storage access.
//! - Reduce every failure to one of three kinds: validation, not found, or
//!   storage.
//!
//! # Invariants
//! - Storage failures are logged with their cause before being returned.
//! - A missing row is `NotFound`; it is never reported as a storage error.

pub mod collection_service;
pub mod preference_service;
pub mod record_service;

use crate::model::{EntityKind, ValidationError};
use crate::repo::RepoError;
use log::error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {field}={id}")]
    NotFound {
        entity: EntityKind,
        field: &'static str,
        id: String,
    },
    #[error("storage failure: {0}")]
    Storage(#[source] RepoError),
}

impl ServiceError {
    /// Validation and not-found errors are fixed by the caller; storage
    /// errors need a retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    /// Field name carried by validation and not-found errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.field),
            Self::NotFound { field, .. } => Some(*field),
            Self::Storage(_) => None,
        }
    }
}

pub(crate) trait RepoResultExt<T> {
    /// Maps repository errors for the named operation, logging storage causes.
    fn for_op(self, operation: &'static str) -> ServiceResult<T>;
}

impl<T> RepoResultExt<T> for Result<T, RepoError> {
    fn for_op(self, operation: &'static str) -> ServiceResult<T> {
        self.map_err(|err| match err {
            RepoError::NotFound { entity, field, id } => {
                ServiceError::NotFound { entity, field, id }
            }
            other => {
                error!(
                    "event=storage_error module=service status=error op={} error={}",
                    operation, other
                );
                ServiceError::Storage(other)
            }
        })
    }
}
