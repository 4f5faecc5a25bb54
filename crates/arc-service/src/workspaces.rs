//! Workspace operations (§4.2, §4.3).

use arc_core::error::{ArcError, Result};
use arc_core::validation::validate_new_workspace;
use arc_core::workspace::{NewWorkspace, Workspace, WorkspaceUpdates};
use arc_storage::Statistics;

use crate::Service;
use crate::ids::allocate_workspace_id;

impl Service {
    pub fn create_workspace(&self, new: NewWorkspace) -> Result<Workspace> {
        validate_new_workspace(&new).map_err(|e| ArcError::bad_request(e.to_string()))?;

        let id = allocate_workspace_id(self.store.as_ref(), &new.name)?;
        let now = chrono::Utc::now();
        let workspace = Workspace {
            id,
            name: new.name,
            path: new.path,
            description: new.description,
            prefix: new.prefix,
            created_at: now,
            updated_at: now,
        };

        self.store.create_workspace(&workspace)?;
        Ok(workspace)
    }

    pub fn get_workspace(&self, id: &str) -> Result<Workspace> {
        Ok(self.store.get_workspace(id)?)
    }

    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        Ok(self.store.list_workspaces()?)
    }

    pub fn update_workspace(&self, id: &str, updates: WorkspaceUpdates) -> Result<Workspace> {
        if updates.is_empty() {
            return Err(ArcError::bad_request("no fields present in update"));
        }
        if let Some(ref prefix) = updates.prefix {
            arc_core::validation::validate_prefix(prefix).map_err(|e| ArcError::bad_request(e.to_string()))?;
        }
        self.store.update_workspace(id, &updates)?;
        Ok(self.store.get_workspace(id)?)
    }

    pub fn delete_workspace(&self, id: &str) -> Result<()> {
        Ok(self.store.delete_workspace(id)?)
    }

    pub fn workspace_statistics(&self, id: &str) -> Result<Statistics> {
        // Surfaces NotFound for an unknown workspace rather than silently
        // returning zeroed stats.
        self.store.get_workspace(id)?;
        Ok(self.store.workspace_statistics(id)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arc_storage::SqliteStore;

    use super::*;

    fn service() -> Service {
        Service::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    #[test]
    fn create_workspace_allocates_id() {
        let svc = service();
        let ws = svc
            .create_workspace(NewWorkspace {
                name: "alpha".into(),
                path: None,
                description: String::new(),
                prefix: "a".into(),
            })
            .unwrap();
        assert!(ws.id.starts_with("ws-"));
        assert_eq!(ws.id.len(), 9);
    }

    #[test]
    fn create_workspace_rejects_invalid_prefix() {
        let svc = service();
        let err = svc
            .create_workspace(NewWorkspace {
                name: "alpha".into(),
                path: None,
                description: String::new(),
                prefix: "has space".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ArcError::BadRequest(_)));
    }

    #[test]
    fn duplicate_name_is_conflict() {
        let svc = service();
        let new = |prefix: &str| NewWorkspace {
            name: "alpha".into(),
            path: None,
            description: String::new(),
            prefix: prefix.into(),
        };
        svc.create_workspace(new("a")).unwrap();
        let err = svc.create_workspace(new("b")).unwrap_err();
        assert!(matches!(err, ArcError::Conflict(_)));
    }

    #[test]
    fn update_with_no_fields_is_bad_request() {
        let svc = service();
        let ws = svc
            .create_workspace(NewWorkspace {
                name: "alpha".into(),
                path: None,
                description: String::new(),
                prefix: "a".into(),
            })
            .unwrap();
        let err = svc.update_workspace(&ws.id, WorkspaceUpdates::default()).unwrap_err();
        assert!(matches!(err, ArcError::BadRequest(_)));
    }

    #[test]
    fn statistics_on_unknown_workspace_is_not_found() {
        let svc = service();
        assert!(svc.workspace_statistics("ws-nope01").unwrap_err().is_not_found());
    }
}
