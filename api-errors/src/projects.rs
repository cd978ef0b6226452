use std::sync::RwLock;

use axum::http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::HttpError;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project {0} not found")]
    NotFound(u64),
    #[error("A project named '{0}' already exists")]
    NameTaken(String),
    #[error("Project limit of {0} reached")]
    LimitReached(usize),
    #[error("Project store is unavailable")]
    StoreUnavailable,
}

impl HttpError for ProjectError {
    fn code(&self) -> &'static str {
        match self {
            ProjectError::NotFound(_) => "PROJECT_NOT_FOUND",
            ProjectError::NameTaken(_) => "PROJECT_NAME_TAKEN",
            ProjectError::LimitReached(_) => "PROJECT_LIMIT_REACHED",
            ProjectError::StoreUnavailable => "PROJECT_STORE_UNAVAILABLE",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ProjectError::NotFound(_) => StatusCode::NOT_FOUND,
            ProjectError::NameTaken(_) => StatusCode::CONFLICT,
            ProjectError::LimitReached(_) => StatusCode::FORBIDDEN,
            ProjectError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub settings: ProjectSettings,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectSettings {
    #[validate(range(min = 1, max = 365, message = "Retention must be between 1 and 365 days"))]
    pub retention_days: u32,
    pub public: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            retention_days: 30,
            public: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(nested)]
    pub settings: Option<ProjectSettings>,
    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 tags are allowed"))]
    pub tags: Vec<String>,
}

/// Path parameters of `/projects/:id`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProjectPath {
    pub id: u64,
}

#[derive(Debug)]
struct Projects {
    next_id: u64,
    by_id: IndexMap<u64, Project>,
}

/// In-memory project storage, in creation order.
#[derive(Debug)]
pub struct ProjectStore {
    max_projects: usize,
    inner: RwLock<Projects>,
}

impl ProjectStore {
    pub fn new(max_projects: usize) -> Self {
        Self {
            max_projects,
            inner: RwLock::new(Projects {
                next_id: 1,
                by_id: IndexMap::new(),
            }),
        }
    }

    pub fn create(&self, input: CreateProject) -> Result<Project, ProjectError> {
        let mut projects = self
            .inner
            .write()
            .map_err(|_| ProjectError::StoreUnavailable)?;

        // Names are unique ignoring case.
        let taken = projects
            .by_id
            .values()
            .any(|p| p.name.eq_ignore_ascii_case(&input.name));
        if taken {
            return Err(ProjectError::NameTaken(input.name));
        }
        if projects.by_id.len() >= self.max_projects {
            return Err(ProjectError::LimitReached(self.max_projects));
        }

        let id = projects.next_id;
        projects.next_id += 1;
        let project = Project {
            id,
            name: input.name,
            description: input.description,
            settings: input.settings.unwrap_or_default(),
            tags: input.tags,
        };
        projects.by_id.insert(id, project.clone());
        Ok(project)
    }

    pub fn get(&self, id: u64) -> Result<Project, ProjectError> {
        let projects = self
            .inner
            .read()
            .map_err(|_| ProjectError::StoreUnavailable)?;
        projects
            .by_id
            .get(&id)
            .cloned()
            .ok_or(ProjectError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Project>, ProjectError> {
        let projects = self
            .inner
            .read()
            .map_err(|_| ProjectError::StoreUnavailable)?;
        Ok(projects.by_id.values().cloned().collect())
    }

    pub fn delete(&self, id: u64) -> Result<Project, ProjectError> {
        let mut projects = self
            .inner
            .write()
            .map_err(|_| ProjectError::StoreUnavailable)?;
        projects
            .by_id
            .shift_remove(&id)
            .ok_or(ProjectError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn input(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: None,
            settings: None,
            tags: vec![],
        }
    }

    #[test]
    fn create_get_list_delete() {
        let store = ProjectStore::new(10);
        let first = store.create(input("alpha")).unwrap();
        let second = store.create(input("beta")).unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(first.settings, ProjectSettings::default());

        assert_eq!(store.get(2).unwrap().name, "beta");
        assert_eq!(
            store.list().unwrap().iter().map(|p| p.id).collect::<Vec<_>>(),
            [1, 2]
        );

        store.delete(1).unwrap();
        assert!(matches!(store.get(1), Err(ProjectError::NotFound(1))));
        assert!(matches!(store.delete(1), Err(ProjectError::NotFound(1))));
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        let store = ProjectStore::new(10);
        store.create(input("Alpha")).unwrap();
        let err = store.create(input("alpha")).unwrap_err();
        assert!(matches!(err, ProjectError::NameTaken(ref n) if n == "alpha"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn limit_is_enforced() {
        let store = ProjectStore::new(1);
        store.create(input("one")).unwrap();
        let err = store.create(input("two")).unwrap_err();
        assert!(matches!(err, ProjectError::LimitReached(1)));
        assert_eq!(err.code(), "PROJECT_LIMIT_REACHED");
    }

    #[test]
    fn poisoned_store_is_unavailable() {
        let store = Arc::new(ProjectStore::new(10));
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = store.get(1).unwrap_err();
        assert!(matches!(err, ProjectError::StoreUnavailable));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
