//! Inline and shared plan resolution (§4.2): setting/reading the inline
//! plan-history on an issue, shared plan CRUD, issue linking, and the
//! composite `GetPlanContext` view.

use arc_core::comment::Comment;
use arc_core::enums::CommentType;
use arc_core::error::{ArcError, Result};
use arc_core::plan::{NewSharedPlan, PlanContext, SharedPlan, SharedPlanUpdates};
use arc_core::validation::validate_new_plan;

use crate::Service;
use crate::ids::allocate_plan_id;
use crate::issues::hierarchical_parent;

impl Service {
    /// Appends a new plan-typed comment -- setting a plan never overwrites
    /// history (§3, §4.2).
    pub fn set_inline_plan(&self, workspace_id: &str, issue_id: &str, author: &str, text: &str) -> Result<Comment> {
        self.get_issue(workspace_id, issue_id)?;
        if text.trim().is_empty() {
            return Err(ArcError::bad_request("plan text must not be empty"));
        }
        let comment = Comment {
            id: 0,
            issue_id: issue_id.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            comment_type: CommentType::Plan,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        Ok(self.store.add_comment(&comment)?)
    }

    pub fn get_inline_plan(&self, workspace_id: &str, issue_id: &str) -> Result<Option<Comment>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_latest_plan(issue_id)?)
    }

    pub fn get_plan_history(&self, workspace_id: &str, issue_id: &str) -> Result<Vec<Comment>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_plan_history(issue_id)?)
    }

    /// The composite view: inline plan, first-parent-only inherited plan,
    /// and linked shared plans -- each independently present or absent
    /// (§4.2).
    pub fn get_plan_context(&self, workspace_id: &str, issue_id: &str) -> Result<PlanContext> {
        let issue = self.get_issue(workspace_id, issue_id)?;

        let inline = self.store.get_latest_plan(issue_id)?.map(|c| c.text);

        let parent = match hierarchical_parent(&issue) {
            Some(parent_id) => self.store.get_latest_plan(parent_id)?.map(|c| c.text),
            None => None,
        };

        let shared = self.store.plans_for_issue(issue_id)?;

        Ok(PlanContext { inline, parent, shared })
    }

    pub fn create_plan(&self, workspace_id: &str, new: NewSharedPlan) -> Result<SharedPlan> {
        self.store.get_workspace(workspace_id)?;
        validate_new_plan(&new).map_err(|e| ArcError::bad_request(e.to_string()))?;

        let id = allocate_plan_id(self.store.as_ref(), &new.title)?;
        let now = chrono::Utc::now();
        let plan = SharedPlan {
            id,
            workspace_id: workspace_id.to_string(),
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
        };
        self.store.create_plan(&plan)?;
        Ok(plan)
    }

    fn get_owned_plan(&self, workspace_id: &str, id: &str) -> Result<SharedPlan> {
        let plan = self.store.get_plan(id)?;
        if plan.workspace_id != workspace_id {
            return Err(ArcError::Forbidden);
        }
        Ok(plan)
    }

    pub fn get_plan(&self, workspace_id: &str, id: &str) -> Result<SharedPlan> {
        self.get_owned_plan(workspace_id, id)
    }

    pub fn list_plans(&self, workspace_id: &str) -> Result<Vec<SharedPlan>> {
        self.store.get_workspace(workspace_id)?;
        Ok(self.store.list_plans(workspace_id)?)
    }

    pub fn update_plan(&self, workspace_id: &str, id: &str, updates: SharedPlanUpdates) -> Result<SharedPlan> {
        if updates.is_empty() {
            return Err(ArcError::bad_request("no fields present in update"));
        }
        self.get_owned_plan(workspace_id, id)?;
        self.store.update_plan(id, &updates)?;
        self.get_owned_plan(workspace_id, id)
    }

    pub fn delete_plan(&self, workspace_id: &str, id: &str) -> Result<()> {
        self.get_owned_plan(workspace_id, id)?;
        Ok(self.store.delete_plan(id)?)
    }

    /// Links a plan to an issue. Both must resolve to the same workspace,
    /// checked here rather than left to an FK: a mismatch is `Forbidden`,
    /// not silently allowed or leaked as `NotFound`.
    pub fn link_plan(&self, workspace_id: &str, plan_id: &str, issue_id: &str) -> Result<()> {
        self.get_owned_plan(workspace_id, plan_id)?;
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.link_plan(issue_id, plan_id)?)
    }

    pub fn unlink_plan(&self, workspace_id: &str, plan_id: &str, issue_id: &str) -> Result<()> {
        self.get_owned_plan(workspace_id, plan_id)?;
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.unlink_plan(issue_id, plan_id)?)
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

    fn fixture() -> (Service, String, String) {
        let svc = Service::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let ws = svc
            .create_workspace(NewWorkspace { name: "alpha".into(), path: None, description: String::new(), prefix: "a".into() })
            .unwrap();
        let issue = svc.create_issue(&ws.id, new_issue("Task"), "alice").unwrap();
        (svc, ws.id, issue.id)
    }

    #[test]
    fn inline_plan_history_is_reverse_chronological() {
        let (svc, ws, issue) = fixture();
        svc.set_inline_plan(&ws, &issue, "alice", "v1").unwrap();
        svc.set_inline_plan(&ws, &issue, "alice", "v2").unwrap();
        svc.set_inline_plan(&ws, &issue, "alice", "v3").unwrap();

        let latest = svc.get_inline_plan(&ws, &issue).unwrap().unwrap();
        assert_eq!(latest.text, "v3");

        let history = svc.get_plan_history(&ws, &issue).unwrap();
        let texts: Vec<_> = history.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["v3", "v2", "v1"]);
    }

    #[test]
    fn empty_plan_text_is_bad_request() {
        let (svc, ws, issue) = fixture();
        let err = svc.set_inline_plan(&ws, &issue, "alice", "").unwrap_err();
        assert!(matches!(err, ArcError::BadRequest(_)));
    }

    #[test]
    fn plan_context_includes_inline_parent_and_shared_sources() {
        let (svc, ws, issue) = fixture();
        let mut child = new_issue("Child");
        child.parent_id = Some(issue.clone());
        let child = svc.create_issue(&ws, child, "alice").unwrap();

        svc.set_inline_plan(&ws, &issue, "alice", "parent plan").unwrap();
        svc.set_inline_plan(&ws, &child.id, "alice", "child plan").unwrap();

        let plan = svc
            .create_plan(&ws, NewSharedPlan { title: "Design doc".into(), content: "details".into() })
            .unwrap();
        svc.link_plan(&ws, &plan.id, &child.id).unwrap();

        let ctx = svc.get_plan_context(&ws, &child.id).unwrap();
        assert_eq!(ctx.inline.as_deref(), Some("child plan"));
        assert_eq!(ctx.parent.as_deref(), Some("parent plan"));
        assert_eq!(ctx.shared.len(), 1);
        assert_eq!(ctx.shared[0].id, plan.id);
    }

    #[test]
    fn plan_context_is_empty_when_no_sources_exist() {
        let (svc, ws, issue) = fixture();
        let ctx = svc.get_plan_context(&ws, &issue).unwrap();
        assert!(ctx.inline.is_none());
        assert!(ctx.parent.is_none());
        assert!(ctx.shared.is_empty());
    }

    #[test]
    fn link_unlink_is_idempotent_and_round_trips() {
        let (svc, ws, issue) = fixture();
        let plan = svc
            .create_plan(&ws, NewSharedPlan { title: "Design doc".into(), content: "details".into() })
            .unwrap();
        svc.link_plan(&ws, &plan.id, &issue).unwrap();
        svc.unlink_plan(&ws, &plan.id, &issue).unwrap();
        assert!(svc.get_plan_context(&ws, &issue).unwrap().shared.is_empty());
        // Unlinking an absent link is a no-op, not an error (§8).
        svc.unlink_plan(&ws, &plan.id, &issue).unwrap();
    }

    #[test]
    fn linking_a_plan_to_an_issue_in_another_workspace_is_forbidden() {
        let (svc, ws_a, _issue_a) = fixture();
        let ws_b = svc
            .create_workspace(NewWorkspace { name: "beta".into(), path: None, description: String::new(), prefix: "b".into() })
            .unwrap();
        let issue_b = svc.create_issue(&ws_b.id, new_issue("In B"), "alice").unwrap();
        let plan = svc
            .create_plan(&ws_a, NewSharedPlan { title: "Design doc".into(), content: "details".into() })
            .unwrap();

        let err = svc.link_plan(&ws_a, &plan.id, &issue_b.id).unwrap_err();
        assert!(matches!(err, ArcError::Forbidden));
    }

    #[test]
    fn create_plan_rejects_empty_content() {
        let (svc, ws, _issue) = fixture();
        let err = svc
            .create_plan(&ws, NewSharedPlan { title: "Design doc".into(), content: String::new() })
            .unwrap_err();
        assert!(matches!(err, ArcError::BadRequest(_)));
    }
}
