//! Storage and transaction trait definitions.
//!
//! [`Storage`] is the public surface the service layer talks to. A
//! transaction handed to a closure via [`Storage::run_in_transaction`]
//! exposes the same mutating operations, scoped to a single commit/rollback
//! unit (§5).

use arc_core::comment::{Comment, Event, Label, LabelUpdates};
use arc_core::dependency::{Dependency, DependencyCounts};
use arc_core::filter::{IssueFilter, WorkFilter};
use arc_core::issue::{Issue, IssueUpdates};
use arc_core::plan::{SharedPlan, SharedPlanUpdates};
use arc_core::workspace::{Workspace, WorkspaceUpdates};
use serde::Serialize;

use crate::error::Result;

/// An issue together with how many open issues block it.
#[derive(Debug, Clone, Serialize)]
pub struct BlockedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    pub blocked_by_count: i64,
    pub blocked_by: Vec<String>,
}

/// Per-workspace aggregate counts, per §4.1.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub blocked: i64,
    pub deferred: i64,
    pub closed: i64,
    pub ready_count: i64,
    /// Average hours between `created_at` and `closed_at` across closed
    /// issues; `None` when no issue in the workspace has been closed yet.
    pub average_lead_time_hours: Option<f64>,
}

/// Mutating and read operations common to [`crate::sqlite::store::SqliteStore`]
/// and the transaction handle passed to [`Storage::run_in_transaction`].
pub trait Transaction {
    fn create_issue(&self, issue: &Issue, actor: &str) -> Result<()>;
    fn get_issue(&self, id: &str) -> Result<Issue>;
    fn update_issue(&self, id: &str, updates: &IssueUpdates, actor: &str) -> Result<()>;
    fn close_issue(&self, id: &str, reason: &str, actor: &str) -> Result<()>;
    fn reopen_issue(&self, id: &str, actor: &str) -> Result<()>;
    fn delete_issue(&self, id: &str) -> Result<()>;

    fn add_dependency(&self, dep: &Dependency) -> Result<()>;
    fn remove_dependency(&self, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()>;

    fn add_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()>;
    fn remove_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()>;

    fn add_comment(&self, comment: &Comment) -> Result<Comment>;

    fn set_metadata(&self, key: &str, value: &str) -> Result<()>;
    fn get_metadata(&self, key: &str) -> Result<String>;
}

/// The full storage contract used by the service layer.
pub trait Storage: Send + Sync {
    // -- workspaces ---------------------------------------------------
    fn create_workspace(&self, workspace: &Workspace) -> Result<()>;
    fn get_workspace(&self, id: &str) -> Result<Workspace>;
    fn get_workspace_by_name(&self, name: &str) -> Result<Workspace>;
    fn list_workspaces(&self) -> Result<Vec<Workspace>>;
    fn update_workspace(&self, id: &str, updates: &WorkspaceUpdates) -> Result<()>;
    fn delete_workspace(&self, id: &str) -> Result<()>;
    fn workspace_statistics(&self, workspace_id: &str) -> Result<Statistics>;

    // -- issues ---------------------------------------------------------
    fn create_issue(&self, issue: &Issue, actor: &str) -> Result<()>;
    fn get_issue(&self, id: &str) -> Result<Issue>;
    fn update_issue(&self, id: &str, updates: &IssueUpdates, actor: &str) -> Result<()>;
    fn close_issue(&self, id: &str, reason: &str, actor: &str) -> Result<()>;
    fn reopen_issue(&self, id: &str, actor: &str) -> Result<()>;
    fn delete_issue(&self, id: &str) -> Result<()>;
    fn search_issues(&self, workspace_id: &str, filter: &IssueFilter) -> Result<Vec<Issue>>;
    fn last_child_number(&self, parent_id: &str) -> Result<i64>;
    fn allocate_child_number(&self, parent_id: &str) -> Result<i64>;

    // -- dependencies -----------------------------------------------------
    fn add_dependency(&self, dep: &Dependency) -> Result<()>;
    fn remove_dependency(&self, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()>;
    fn get_outgoing_dependencies(&self, issue_id: &str) -> Result<Vec<Dependency>>;
    fn get_incoming_dependencies(&self, issue_id: &str) -> Result<Vec<Dependency>>;
    fn dependency_counts(&self, issue_id: &str) -> Result<DependencyCounts>;

    // -- labels -----------------------------------------------------------
    fn create_label(&self, label: &Label) -> Result<()>;
    fn get_label(&self, name: &str) -> Result<Label>;
    fn list_labels(&self) -> Result<Vec<Label>>;
    fn update_label(&self, name: &str, updates: &LabelUpdates) -> Result<()>;
    fn delete_label(&self, name: &str) -> Result<()>;
    fn add_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()>;
    fn remove_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()>;
    fn get_labels(&self, issue_id: &str) -> Result<Vec<String>>;
    fn labels_for_issues(&self, issue_ids: &[String]) -> Result<Vec<(String, Vec<String>)>>;

    // -- comments ---------------------------------------------------------
    fn add_comment(&self, comment: &Comment) -> Result<Comment>;
    fn get_comments(&self, issue_id: &str) -> Result<Vec<Comment>>;
    fn get_events(&self, issue_id: &str, limit: Option<i64>) -> Result<Vec<Event>>;

    fn get_comment(&self, id: i64) -> Result<Comment>;
    fn update_comment(&self, id: i64, text: &str) -> Result<Comment>;
    fn delete_comment(&self, id: i64) -> Result<()>;
    /// Most recent plan-typed comment on an issue, for inline plan resolution (§4.2).
    fn get_latest_plan(&self, issue_id: &str) -> Result<Option<Comment>>;
    /// Full reverse-chronological history of plan-typed comments on an issue.
    fn get_plan_history(&self, issue_id: &str) -> Result<Vec<Comment>>;

    // -- shared plans -------------------------------------------------------
    fn create_plan(&self, plan: &SharedPlan) -> Result<()>;
    fn get_plan(&self, id: &str) -> Result<SharedPlan>;
    fn list_plans(&self, workspace_id: &str) -> Result<Vec<SharedPlan>>;
    fn update_plan(&self, id: &str, updates: &SharedPlanUpdates) -> Result<()>;
    fn delete_plan(&self, id: &str) -> Result<()>;
    fn link_plan(&self, issue_id: &str, plan_id: &str) -> Result<()>;
    fn unlink_plan(&self, issue_id: &str, plan_id: &str) -> Result<()>;
    fn plans_for_issue(&self, issue_id: &str) -> Result<Vec<SharedPlan>>;

    // -- queries ------------------------------------------------------------
    fn ready_work(&self, workspace_id: &str, filter: &WorkFilter) -> Result<Vec<Issue>>;
    fn blocked_work(&self, workspace_id: &str) -> Result<Vec<BlockedIssue>>;

    // -- transactions ---------------------------------------------------
    fn run_in_transaction(&self, f: &dyn Fn(&dyn Transaction) -> Result<()>) -> Result<()>;
}
