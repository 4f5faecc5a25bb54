//! Comments and the audit event log (§4.2). Inline-plan operations live in
//! [`crate::plans`]; this module covers plain free-text comments plus the
//! read-only event stream.

use arc_core::comment::{Comment, Event};
use arc_core::enums::CommentType;
use arc_core::error::{ArcError, Result};

use crate::Service;

impl Service {
    pub fn add_comment(&self, workspace_id: &str, issue_id: &str, author: &str, text: &str) -> Result<Comment> {
        self.get_issue(workspace_id, issue_id)?;
        if text.trim().is_empty() {
            return Err(ArcError::bad_request("comment text must not be empty"));
        }
        let comment = Comment {
            id: 0,
            issue_id: issue_id.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            comment_type: CommentType::Comment,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        Ok(self.store.add_comment(&comment)?)
    }

    pub fn get_comments(&self, workspace_id: &str, issue_id: &str) -> Result<Vec<Comment>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_comments(issue_id)?)
    }

    /// Updates the text of a plain comment. The comment must belong to
    /// `issue_id`, which must in turn belong to `workspace_id` -- a
    /// two-level ownership check mirroring the issue-level one (§4.2).
    pub fn update_comment(&self, workspace_id: &str, issue_id: &str, comment_id: i64, text: &str) -> Result<Comment> {
        self.get_issue(workspace_id, issue_id)?;
        if text.trim().is_empty() {
            return Err(ArcError::bad_request("comment text must not be empty"));
        }
        let existing = self.store.get_comment(comment_id)?;
        if existing.issue_id != issue_id {
            return Err(ArcError::not_found("comment", comment_id.to_string()));
        }
        Ok(self.store.update_comment(comment_id, text)?)
    }

    pub fn delete_comment(&self, workspace_id: &str, issue_id: &str, comment_id: i64) -> Result<()> {
        self.get_issue(workspace_id, issue_id)?;
        let existing = self.store.get_comment(comment_id)?;
        if existing.issue_id != issue_id {
            return Err(ArcError::not_found("comment", comment_id.to_string()));
        }
        Ok(self.store.delete_comment(comment_id)?)
    }

    pub fn get_events(&self, workspace_id: &str, issue_id: &str, limit: Option<i64>) -> Result<Vec<Event>> {
        self.get_issue(workspace_id, issue_id)?;
        Ok(self.store.get_events(issue_id, limit)?)
    }
}
