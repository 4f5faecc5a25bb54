//! Dependency edges between issues (§4.2).

use arc_core::dependency::{Dependency, DependencyCounts, DependencyType};
use arc_core::error::{ArcError, Result};

use crate::Service;

impl Service {
    /// Both endpoints must already belong to `workspace_id` -- cross-workspace
    /// dependency edges are rejected outright, not merely hidden (§9).
    pub fn add_dependency(
        &self,
        workspace_id: &str,
        issue_id: &str,
        depends_on_id: &str,
        dep_type: DependencyType,
        actor: &str,
    ) -> Result<()> {
        self.get_issue(workspace_id, issue_id)?;
        self.get_issue(workspace_id, depends_on_id)?;

        let dep = Dependency {
            issue_id: issue_id.to_string(),
            depends_on_id: depends_on_id.to_string(),
            dep_type,
            created_at: chrono::Utc::now(),
            created_by: actor.to_string(),
        };
        Ok(self.store.add_dependency(&dep)?)
    }

    pub fn remove_dependency(&self, workspace_id: &str, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.remove_dependency(issue_id, depends_on_id, actor)?)
    }

    pub fn get_outgoing_dependencies(&self, workspace_id: &str, issue_id: &str) -> Result<Vec<Dependency>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_outgoing_dependencies(issue_id)?)
    }

    pub fn get_incoming_dependencies(&self, workspace_id: &str, issue_id: &str) -> Result<Vec<Dependency>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_incoming_dependencies(issue_id)?)
    }

    pub fn dependency_counts(&self, workspace_id: &str, issue_id: &str) -> Result<DependencyCounts> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.dependency_counts(issue_id)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arc_core::issue::NewIssue;
    use arc_core::workspace::NewWorkspace;
    use arc_storage::SqliteStore;

    use super::*;

    fn new_issue(title: &str) -> NewIssue {
        NewIssue {
            title: title.into(),
            description: String::new(),
            status: None,
            priority: None,
            issue_type: None,
            assignee: None,
            external_ref: None,
            rank: None,
            parent_id: None,
        }
    }

    fn fixture() -> (Service, String, String, String) {
        let svc = Service::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let ws = svc
            .create_workspace(NewWorkspace { name: "alpha".into(), path: None, description: String::new(), prefix: "a".into() })
            .unwrap();
        let a = svc.create_issue(&ws.id, new_issue("A"), "alice").unwrap();
        let b = svc.create_issue(&ws.id, new_issue("B"), "alice").unwrap();
        (svc, ws.id, a.id, b.id)
    }

    #[test]
    fn add_and_remove_dependency() {
        let (svc, ws, a, b) = fixture();
        svc.add_dependency(&ws, &a, &b, DependencyType::Blocks, "alice").unwrap();

        let outgoing = svc.get_outgoing_dependencies(&ws, &a).unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].depends_on_id, b);

        svc.remove_dependency(&ws, &a, &b, "alice").unwrap();
        assert!(svc.get_outgoing_dependencies(&ws, &a).unwrap().is_empty());
    }

    #[test]
    fn depending_on_issue_from_another_workspace_is_forbidden() {
        let (svc, ws_a, a, _b) = fixture();
        let ws_b = svc
            .create_workspace(NewWorkspace { name: "beta".into(), path: None, description: String::new(), prefix: "b".into() })
            .unwrap();
        let c = svc.create_issue(&ws_b.id, new_issue("C"), "alice").unwrap();

        let err = svc.add_dependency(&ws_a, &a, &c.id, DependencyType::Blocks, "alice").unwrap_err();
        assert!(matches!(err, ArcError::Forbidden));
    }

    #[test]
    fn dependency_counts_reflect_edges() {
        let (svc, ws, a, b) = fixture();
        svc.add_dependency(&ws, &a, &b, DependencyType::Blocks, "alice").unwrap();

        let counts = svc.dependency_counts(&ws, &a).unwrap();
        assert_eq!(counts.dependency_count, 1);
        assert_eq!(counts.dependent_count, 0);
    }
}
