//! Project operations.
//!
//! Deleting a project removes the project record only. Tasks keep whatever
//! project string they reference; clients treat dangling names as "Inbox".

use crate::error::{ApiError, ApiResult};
use crate::store::{JsonFileStore, StoreError};
use crate::types::{Project, ProjectCreate};
use std::path::Path;

/// Service for the project collection, backed by `projects.json`.
#[derive(Clone)]
pub struct ProjectService {
    store: JsonFileStore<Project>,
}

fn store_err(err: StoreError, name: &str) -> ApiError {
    match err {
        StoreError::DuplicateKey(_) => ApiError::project_exists(name),
        StoreError::KeyNotFound(_) => ApiError::project_not_found(name),
        other => ApiError::storage(other),
    }
}

impl ProjectService {
    pub fn open(data_dir: &Path) -> ApiResult<Self> {
        let store = JsonFileStore::open(data_dir.join("projects.json"), "projects")?;
        Ok(Self { store })
    }

    pub fn list(&self) -> Vec<Project> {
        self.store.all()
    }

    pub fn get(&self, name: &str) -> ApiResult<Project> {
        self.store
            .get(name)
            .ok_or_else(|| ApiError::project_not_found(name))
    }

    pub fn create(&self, input: ProjectCreate) -> ApiResult<Project> {
        if input.name.trim().is_empty() {
            return Err(ApiError::missing_field("name"));
        }
        let project = Project::new(input.name);
        self.store
            .add(&project)
            .map_err(|e| store_err(e, &project.name))?;
        Ok(project)
    }

    /// Delete a project by name. `false` when no such project exists.
    pub fn delete(&self, name: &str) -> ApiResult<bool> {
        self.store.remove(name).map_err(|e| store_err(e, name))
    }
}
