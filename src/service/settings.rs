//! Settings singleton operations.

use crate::error::ApiResult;
use crate::store::SingletonStore;
use crate::types::{Settings, SettingsPatch};
use std::path::Path;

/// Service for the settings singleton, backed by `settings.json`.
#[derive(Clone)]
pub struct SettingsService {
    store: SingletonStore<Settings>,
}

impl SettingsService {
    pub fn open(data_dir: &Path) -> ApiResult<Self> {
        let store = SingletonStore::open(data_dir.join("settings.json"))?;
        Ok(Self { store })
    }

    /// Current settings; defaults when nothing has been stored yet.
    pub fn get(&self) -> Settings {
        self.store.get()
    }

    /// Replace the settings wholesale.
    pub fn update(&self, settings: Settings) -> ApiResult<Settings> {
        self.store.set(&settings)?;
        Ok(settings)
    }

    /// Merge provided fields into the current settings.
    pub fn patch(&self, patch: SettingsPatch) -> ApiResult<Settings> {
        let mut settings = self.get();
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
        if let Some(sort_order) = patch.sort_order {
            settings.sort_order = sort_order;
        }
        self.update(settings)
    }
}
