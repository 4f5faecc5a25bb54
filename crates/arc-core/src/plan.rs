//! Shared plans -- standalone, linkable plan documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A standalone plan document, linkable to any number of issues within its
/// own workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedPlan {
    pub id: String,
    pub workspace_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a shared plan.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSharedPlan {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Typed partial-update record for a shared plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedPlanUpdates {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl SharedPlanUpdates {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// The composite view returned by `GetPlanContext` (§4.2): up to three
/// independently present/absent plan sources for a given issue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanContext {
    /// Latest plan-typed comment on the issue itself, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<String>,
    /// Latest plan-typed comment on the issue's parent, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Shared plans linked to the issue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared: Vec<SharedPlan>,
}
