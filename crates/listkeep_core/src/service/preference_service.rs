//! Preferences use-case service.
//!
//! A missing singleton row means the store is corrupted; every operation
//! reports that as a storage error.

use super::{RepoResultExt, ServiceResult};
use crate::model::now_epoch_ms;
use crate::model::preferences::{
    normalize_selection_id, validate_overrides, ColorOverrides, Preferences, CUSTOM_SELECTION_ID,
    DEFAULT_SELECTION_ID,
};
use crate::repo::preference_repo::PreferenceRepository;

pub struct PreferenceService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> PreferenceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get(&self) -> ServiceResult<Preferences> {
        self.repo.load_preferences().for_op("preferences.get")
    }

    /// Activates `selection_id`.
    ///
    /// Selecting the custom sentinel keeps the stored overrides; any other
    /// selection clears them.
    pub fn update_selection(&self, selection_id: &str) -> ServiceResult<Preferences> {
        let selection_id = normalize_selection_id(selection_id)?;
        self.repo
            .store_selection(&selection_id, now_epoch_ms())
            .for_op("preferences.update_selection")
    }

    /// Stores `overrides` and switches to the custom selection.
    pub fn update_overrides(&self, overrides: &ColorOverrides) -> ServiceResult<Preferences> {
        validate_overrides(overrides)?;
        self.repo
            .store_preferences(CUSTOM_SELECTION_ID, Some(overrides), now_epoch_ms())
            .for_op("preferences.update_overrides")
    }

    pub fn reset_to_default(&self) -> ServiceResult<Preferences> {
        self.repo
            .store_preferences(DEFAULT_SELECTION_ID, None, now_epoch_ms())
            .for_op("preferences.reset")
    }
}
