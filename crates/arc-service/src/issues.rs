//! Issue operations: CRUD, hierarchical/top-level ID allocation, and
//! workspace authorization (§4.2).

use arc_core::dependency::{Dependency, DependencyType};
use arc_core::error::{ArcError, Result};
use arc_core::filter::IssueFilter;
use arc_core::idgen::{format_child_id, is_hierarchical_id, parent_of};
use arc_core::issue::{Issue, IssueBuilder, IssueDetails, IssueUpdates, NewIssue};
use arc_core::validation::validate_issue;
use tracing::warn;

use crate::Service;
use crate::ids::allocate_issue_id;

impl Service {
    /// Fetches an issue and verifies it belongs to `workspace_id`.
    /// Nonexistent issue -> NotFound; cross-workspace access -> Forbidden,
    /// never leaking whether the issue exists elsewhere (§8 boundary).
    fn get_owned_issue(&self, workspace_id: &str, issue_id: &str) -> Result<Issue> {
        let issue = self.store.get_issue(issue_id)?;
        if issue.workspace_id != workspace_id {
            return Err(ArcError::Forbidden);
        }
        Ok(issue)
    }

    pub fn create_issue(&self, workspace_id: &str, new: NewIssue, actor: &str) -> Result<Issue> {
        let workspace = self.store.get_workspace(workspace_id)?;

        let (id, parent_id) = match new.parent_id {
            Some(ref parent_id) => {
                let parent = self.get_owned_issue(workspace_id, parent_id)?;
                let n = self.store.allocate_child_number(&parent.id)?;
                (format_child_id(&parent.id, n), Some(parent.id))
            }
            None => {
                let id = allocate_issue_id(self.store.as_ref(), &workspace.prefix, &new.title)?;
                (id, None)
            }
        };

        let mut builder = IssueBuilder::new(workspace_id, new.title).id(id);
        if !new.description.is_empty() {
            builder = builder.description(new.description);
        }
        if let Some(status) = new.status {
            builder = builder.status(status);
        }
        if let Some(priority) = new.priority {
            builder = builder.priority(priority);
        }
        if let Some(issue_type) = new.issue_type {
            builder = builder.issue_type(issue_type);
        }
        if let Some(assignee) = new.assignee {
            builder = builder.assignee(assignee);
        }
        if let Some(external_ref) = new.external_ref {
            builder = builder.external_ref(external_ref);
        }
        if let Some(rank) = new.rank {
            builder = builder.rank(rank);
        }
        let issue = builder.build();

        validate_issue(&issue).map_err(|e| ArcError::bad_request(e.to_string()))?;
        self.store.create_issue(&issue, actor)?;

        if let Some(parent_id) = parent_id {
            // Best-effort per §7: the primary create has already succeeded;
            // a failure here is logged, not surfaced.
            let dep = Dependency {
                issue_id: issue.id.clone(),
                depends_on_id: parent_id.clone(),
                dep_type: DependencyType::ParentChild,
                created_at: chrono::Utc::now(),
                created_by: actor.to_string(),
            };
            if let Err(e) = self.store.add_dependency(&dep) {
                warn!(issue_id = %issue.id, parent_id = %parent_id, error = %e, "failed to auto-create parent-child dependency");
            }
        }

        Ok(issue)
    }

    pub fn get_issue(&self, workspace_id: &str, id: &str) -> Result<Issue> {
        self.get_owned_issue(workspace_id, id)
    }

    pub fn get_issue_details(&self, workspace_id: &str, id: &str) -> Result<IssueDetails> {
        let issue = self.get_owned_issue(workspace_id, id)?;
        let labels = self.store.get_labels(id)?;
        let depends_on = self.store.get_outgoing_dependencies(id)?.into_iter().map(|d| d.depends_on_id).collect();
        let dependents = self.store.get_incoming_dependencies(id)?.into_iter().map(|d| d.issue_id).collect();
        let comments = self.store.get_comments(id)?;
        Ok(IssueDetails { issue, labels, depends_on, dependents, comments })
    }

    pub fn update_issue(&self, workspace_id: &str, id: &str, updates: IssueUpdates, actor: &str) -> Result<Issue> {
        if updates.is_empty() {
            return Err(ArcError::bad_request("no fields present in update"));
        }
        self.get_owned_issue(workspace_id, id)?;
        if let Some(priority) = updates.priority {
            if !(0..=4).contains(&priority) {
                return Err(ArcError::bad_request(format!("priority must be between 0 and 4 (got {priority})")));
            }
        }
        self.store.update_issue(id, &updates, actor)?;
        self.get_owned_issue(workspace_id, id)
    }

    pub fn close_issue(&self, workspace_id: &str, id: &str, reason: &str, actor: &str) -> Result<Issue> {
        self.get_owned_issue(workspace_id, id)?;
        self.store.close_issue(id, reason, actor)?;
        self.get_owned_issue(workspace_id, id)
    }

    pub fn reopen_issue(&self, workspace_id: &str, id: &str, actor: &str) -> Result<Issue> {
        self.get_owned_issue(workspace_id, id)?;
        self.store.reopen_issue(id, actor)?;
        self.get_owned_issue(workspace_id, id)
    }

    pub fn delete_issue(&self, workspace_id: &str, id: &str) -> Result<()> {
        self.get_owned_issue(workspace_id, id)?;
        Ok(self.store.delete_issue(id)?)
    }

    pub fn search_issues(&self, workspace_id: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.store.get_workspace(workspace_id)?;
        Ok(self.store.search_issues(workspace_id, filter)?)
    }
}

/// Returns the parent id of `issue`, if its id is hierarchical, for plan
/// resolution (§4.2's "first parent only; do not recurse further").
pub(crate) fn hierarchical_parent(issue: &Issue) -> Option<&str> {
    if is_hierarchical_id(&issue.id) {
        parent_of(&issue.id)
    } else {
        None
    }
}
