//! Wires the `*_impl` inherent methods scattered across the sibling modules
//! to the [`Storage`] trait the service layer depends on.

use arc_core::comment::{Comment, Event, Label, LabelUpdates};
use arc_core::dependency::{Dependency, DependencyCounts};
use arc_core::filter::{IssueFilter, WorkFilter};
use arc_core::issue::{Issue, IssueUpdates};
use arc_core::plan::{SharedPlan, SharedPlanUpdates};
use arc_core::workspace::{Workspace, WorkspaceUpdates};

use crate::error::Result;
use crate::sqlite::store::SqliteStore;
use crate::traits::{BlockedIssue, Statistics, Storage, Transaction};

impl Storage for SqliteStore {
    fn create_workspace(&self, workspace: &Workspace) -> Result<()> {
        self.create_workspace_impl(workspace)
    }
    fn get_workspace(&self, id: &str) -> Result<Workspace> {
        self.get_workspace_impl(id)
    }
    fn get_workspace_by_name(&self, name: &str) -> Result<Workspace> {
        self.get_workspace_by_name_impl(name)
    }
    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.list_workspaces_impl()
    }
    fn update_workspace(&self, id: &str, updates: &WorkspaceUpdates) -> Result<()> {
        self.update_workspace_impl(id, updates)
    }
    fn delete_workspace(&self, id: &str) -> Result<()> {
        self.delete_workspace_impl(id)
    }
    fn workspace_statistics(&self, workspace_id: &str) -> Result<Statistics> {
        self.workspace_statistics_impl(workspace_id)
    }

    fn create_issue(&self, issue: &Issue, actor: &str) -> Result<()> {
        self.create_issue_impl(issue, actor)
    }
    fn get_issue(&self, id: &str) -> Result<Issue> {
        self.get_issue_impl(id)
    }
    fn update_issue(&self, id: &str, updates: &IssueUpdates, actor: &str) -> Result<()> {
        self.update_issue_impl(id, updates, actor)
    }
    fn close_issue(&self, id: &str, reason: &str, actor: &str) -> Result<()> {
        self.close_issue_impl(id, reason, actor)
    }
    fn reopen_issue(&self, id: &str, actor: &str) -> Result<()> {
        self.reopen_issue_impl(id, actor)
    }
    fn delete_issue(&self, id: &str) -> Result<()> {
        self.delete_issue_impl(id)
    }
    fn search_issues(&self, workspace_id: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        self.search_issues_impl(workspace_id, filter)
    }
    fn last_child_number(&self, parent_id: &str) -> Result<i64> {
        self.last_child_number_impl(parent_id)
    }
    fn allocate_child_number(&self, parent_id: &str) -> Result<i64> {
        self.allocate_child_number_impl(parent_id)
    }

    fn add_dependency(&self, dep: &Dependency) -> Result<()> {
        self.add_dependency_impl(dep)
    }
    fn remove_dependency(&self, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()> {
        self.remove_dependency_impl(issue_id, depends_on_id, actor)
    }
    fn get_outgoing_dependencies(&self, issue_id: &str) -> Result<Vec<Dependency>> {
        self.get_outgoing_dependencies_impl(issue_id)
    }
    fn get_incoming_dependencies(&self, issue_id: &str) -> Result<Vec<Dependency>> {
        self.get_incoming_dependencies_impl(issue_id)
    }
    fn dependency_counts(&self, issue_id: &str) -> Result<DependencyCounts> {
        self.dependency_counts_impl(issue_id)
    }

    fn create_label(&self, label: &Label) -> Result<()> {
        self.create_label_impl(label)
    }
    fn get_label(&self, name: &str) -> Result<Label> {
        self.get_label_impl(name)
    }
    fn list_labels(&self) -> Result<Vec<Label>> {
        self.list_labels_impl()
    }
    fn update_label(&self, name: &str, updates: &LabelUpdates) -> Result<()> {
        self.update_label_impl(name, updates)
    }
    fn delete_label(&self, name: &str) -> Result<()> {
        self.delete_label_impl(name)
    }
    fn add_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        self.add_label_impl(issue_id, label, actor)
    }
    fn remove_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        self.remove_label_impl(issue_id, label, actor)
    }
    fn get_labels(&self, issue_id: &str) -> Result<Vec<String>> {
        self.get_labels_impl(issue_id)
    }
    fn labels_for_issues(&self, issue_ids: &[String]) -> Result<Vec<(String, Vec<String>)>> {
        self.labels_for_issues_impl(issue_ids)
    }

    fn add_comment(&self, comment: &Comment) -> Result<Comment> {
        self.add_comment_impl(comment)
    }
    fn get_comments(&self, issue_id: &str) -> Result<Vec<Comment>> {
        self.get_comments_impl(issue_id)
    }
    fn get_events(&self, issue_id: &str, limit: Option<i64>) -> Result<Vec<Event>> {
        self.get_events_impl(issue_id, limit)
    }
    fn get_comment(&self, id: i64) -> Result<Comment> {
        self.get_comment_impl(id)
    }
    fn update_comment(&self, id: i64, text: &str) -> Result<Comment> {
        self.update_comment_impl(id, text)
    }
    fn delete_comment(&self, id: i64) -> Result<()> {
        self.delete_comment_impl(id)
    }
    fn get_latest_plan(&self, issue_id: &str) -> Result<Option<Comment>> {
        self.get_latest_plan_impl(issue_id)
    }
    fn get_plan_history(&self, issue_id: &str) -> Result<Vec<Comment>> {
        self.get_plan_history_impl(issue_id)
    }

    fn create_plan(&self, plan: &SharedPlan) -> Result<()> {
        self.create_plan_impl(plan)
    }
    fn get_plan(&self, id: &str) -> Result<SharedPlan> {
        self.get_plan_impl(id)
    }
    fn list_plans(&self, workspace_id: &str) -> Result<Vec<SharedPlan>> {
        self.list_plans_impl(workspace_id)
    }
    fn update_plan(&self, id: &str, updates: &SharedPlanUpdates) -> Result<()> {
        self.update_plan_impl(id, updates)
    }
    fn delete_plan(&self, id: &str) -> Result<()> {
        self.delete_plan_impl(id)
    }
    fn link_plan(&self, issue_id: &str, plan_id: &str) -> Result<()> {
        self.link_plan_impl(issue_id, plan_id)
    }
    fn unlink_plan(&self, issue_id: &str, plan_id: &str) -> Result<()> {
        self.unlink_plan_impl(issue_id, plan_id)
    }
    fn plans_for_issue(&self, issue_id: &str) -> Result<Vec<SharedPlan>> {
        self.plans_for_issue_impl(issue_id)
    }

    fn ready_work(&self, workspace_id: &str, filter: &WorkFilter) -> Result<Vec<Issue>> {
        self.ready_work_impl(workspace_id, filter)
    }
    fn blocked_work(&self, workspace_id: &str) -> Result<Vec<BlockedIssue>> {
        self.blocked_work_impl(workspace_id)
    }

    fn run_in_transaction(&self, f: &dyn Fn(&dyn Transaction) -> Result<()>) -> Result<()> {
        self.run_in_transaction_impl(f)
    }
}
