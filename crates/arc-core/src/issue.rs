//! Issue struct -- the central unit of work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{IssueType, Status};

/// Helper for `skip_serializing_if` on priority (0 is valid, never skip).
fn is_zero_priority(_p: &i32) -> bool {
    false
}

/// A trackable work item, scoped to a single workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: String,

    pub workspace_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Status::is_default")]
    pub status: Status,

    /// Priority 0-4, 0 = highest. No skip: 0 is valid.
    #[serde(default, skip_serializing_if = "is_zero_priority")]
    pub priority: i32,

    #[serde(default, skip_serializing_if = "IssueType::is_default")]
    pub issue_type: IssueType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub assignee: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,

    /// Manual ordering tiebreaker; default 0.
    #[serde(default)]
    pub rank: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,
}

impl Default for Issue {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            workspace_id: String::new(),
            title: String::new(),
            description: String::new(),
            status: Status::Open,
            priority: 2,
            issue_type: IssueType::Task,
            assignee: String::new(),
            external_ref: None,
            rank: 0,
            created_at: now,
            updated_at: now,
            closed_at: None,
            close_reason: None,
        }
    }
}

/// Fluent constructor for [`Issue`], useful in tests that only care about a
/// handful of fields.
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    pub fn new(workspace_id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut issue = Issue::default();
        issue.workspace_id = workspace_id.into();
        issue.title = title.into();
        Self { issue }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.issue.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.issue.description = description.into();
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.issue.status = status;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.issue.priority = priority;
        self
    }

    pub fn issue_type(mut self, issue_type: IssueType) -> Self {
        self.issue.issue_type = issue_type;
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.issue.assignee = assignee.into();
        self
    }

    pub fn external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.issue.external_ref = Some(external_ref.into());
        self
    }

    pub fn rank(mut self, rank: i32) -> Self {
        self.issue.rank = rank;
        self
    }

    pub fn created_at(mut self, t: DateTime<Utc>) -> Self {
        self.issue.created_at = t;
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

/// Fields accepted when creating a top-level issue. `parent_id` is not an
/// `Issue` field -- it routes the create call through hierarchical ID
/// allocation in the service layer (§4.2) and never appears in the stored
/// row itself.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub issue_type: Option<IssueType>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Typed partial-update record for an issue (replaces the dynamic
/// "updates map" pattern per §9).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueUpdates {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<i32>,
    pub issue_type: Option<IssueType>,
    pub assignee: Option<String>,
    pub external_ref: Option<Option<String>>,
    pub rank: Option<i32>,
}

impl IssueUpdates {
    /// `true` if no field is present -- callers must reject this as a 400.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.issue_type.is_none()
            && self.assignee.is_none()
            && self.external_ref.is_none()
            && self.rank.is_none()
    }
}

/// An issue plus the data needed for the "get-details" composite view:
/// labels, outgoing/incoming dependency ids, and comments.
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetails {
    #[serde(flatten)]
    pub issue: Issue,
    pub labels: Vec<String>,
    pub depends_on: Vec<String>,
    pub dependents: Vec<String>,
    pub comments: Vec<crate::comment::Comment>,
}
