//! Business logic over the file stores, one service per resource.

pub mod projects;
pub mod settings;
pub mod tasks;

pub use projects::ProjectService;
pub use settings::SettingsService;
pub use tasks::{TaskQuery, TaskService};

use crate::error::ApiResult;
use std::path::Path;

/// All resource services, opened against one data directory.
#[derive(Clone)]
pub struct Services {
    pub tasks: TaskService,
    pub projects: ProjectService,
    pub settings: SettingsService,
}

impl Services {
    /// Open (and auto-create) the backing files under `data_dir`.
    pub fn open(data_dir: &Path) -> ApiResult<Self> {
        Ok(Self {
            tasks: TaskService::open(data_dir)?,
            projects: ProjectService::open(data_dir)?,
            settings: SettingsService::open(data_dir)?,
        })
    }
}
