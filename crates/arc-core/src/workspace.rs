//! The top-level tenant namespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named tenant: every issue, dependency, label link, comment, and shared
/// plan is scoped to exactly one workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub prefix: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkspace {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: String,
    pub prefix: String,
}

/// Typed partial-update record for a workspace (§9's "duck-typed request
/// body" redesign: only present fields apply).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceUpdates {
    pub name: Option<String>,
    pub path: Option<Option<String>>,
    pub description: Option<String>,
    pub prefix: Option<String>,
}

impl WorkspaceUpdates {
    /// `true` if no field is present -- callers must reject this as a 400.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.path.is_none()
            && self.description.is_none()
            && self.prefix.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_updates_empty_detection() {
        assert!(WorkspaceUpdates::default().is_empty());
        let updates = WorkspaceUpdates {
            name: Some("renamed".into()),
            ..Default::default()
        };
        assert!(!updates.is_empty());
    }

    #[test]
    fn workspace_serde_roundtrip() {
        let ws = Workspace {
            id: "ws-abc123".into(),
            name: "alpha".into(),
            path: None,
            description: String::new(),
            prefix: "a".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&ws).unwrap();
        let back: Workspace = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, ws.id);
        assert!(!json.contains("\"path\""));
    }
}
