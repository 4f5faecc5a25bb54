//! Ready-work and blocked-work pass-throughs (§4.1, §4.2). The interesting
//! algorithmic work lives in `arc-storage::sqlite::queries`; this layer only
//! confirms the workspace exists before delegating.

use arc_core::error::Result;
use arc_core::filter::WorkFilter;
use arc_core::issue::Issue;
use arc_storage::BlockedIssue;

use crate::Service;

impl Service {
    pub fn ready_work(&self, workspace_id: &str, filter: &WorkFilter) -> Result<Vec<Issue>> {
        self.store.get_workspace(workspace_id)?;
        Ok(self.store.ready_work(workspace_id, filter)?)
    }

    pub fn blocked_work(&self, workspace_id: &str) -> Result<Vec<BlockedIssue>> {
        self.store.get_workspace(workspace_id)?;
        Ok(self.store.blocked_work(workspace_id)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arc_core::dependency::DependencyType;
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

    #[test]
    fn ready_and_blocked_reflect_dependency_state() {
        let svc = Service::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let ws = svc
            .create_workspace(NewWorkspace { name: "alpha".into(), path: None, description: String::new(), prefix: "a".into() })
            .unwrap();
        let x = svc.create_issue(&ws.id, new_issue("X"), "alice").unwrap();
        let y = svc.create_issue(&ws.id, new_issue("Y"), "alice").unwrap();
        svc.add_dependency(&ws.id, &y.id, &x.id, DependencyType::Blocks, "alice").unwrap();

        let ready = svc.ready_work(&ws.id, &WorkFilter::default()).unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, x.id);

        let blocked = svc.blocked_work(&ws.id).unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].issue.id, y.id);
        assert_eq!(blocked[0].blocked_by_count, 1);

        svc.close_issue(&ws.id, &x.id, "done", "alice").unwrap();
        let ready = svc.ready_work(&ws.id, &WorkFilter::default()).unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, y.id);
    }

    #[test]
    fn querying_unknown_workspace_is_not_found() {
        let svc = Service::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        assert!(svc.ready_work("ws-nope01", &WorkFilter::default()).unwrap_err().is_not_found());
    }
}
