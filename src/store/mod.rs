use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use crate::models::Project;

/// Errors surfaced while loading the project list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read project data from {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed project data in {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only source of project records backed by a JSON file.
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every project record from the backing file. Malformed records
    /// (including out-of-enum statuses) fail the whole load.
    pub fn load_projects(&self) -> Result<Vec<Project>, StoreError> {
        let path = self.path.display().to_string();
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path, source })
    }
}

/// Build the store described by the configuration
pub fn init(config: &Config) -> ProjectStore {
    ProjectStore::new(config.data_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;

    fn temp_store(name: &str, contents: &str) -> ProjectStore {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        ProjectStore::new(path)
    }

    #[test]
    fn loads_a_project_list() {
        let store = temp_store(
            "project_dashboard_store_ok.json",
            r#"[
                {
                    "id": "p-1",
                    "name": "Casa Alphaville",
                    "status": "inProgress",
                    "createdAt": "2026-07-01T09:30:00",
                    "value": 42500.0
                },
                {
                    "id": "p-2",
                    "name": "Loja Centro",
                    "status": "completed",
                    "createdAt": "2026-06-12T14:00:00"
                }
            ]"#,
        );
        let projects = store.load_projects().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].status, ProjectStatus::InProgress);
        assert_eq!(projects[1].id, "p-2");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let store = ProjectStore::new("/nonexistent/project_dashboard.json");
        assert!(matches!(
            store.load_projects(),
            Err(StoreError::Read { .. })
        ));
    }

    #[test]
    fn malformed_data_is_a_parse_error() {
        let store = temp_store("project_dashboard_store_bad.json", "[{\"id\": 7}]");
        assert!(matches!(
            store.load_projects(),
            Err(StoreError::Parse { .. })
        ));
    }
}
