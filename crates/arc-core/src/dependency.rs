//! Dependency types -- directed edges between issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::enums::DependencyType;

/// A directed relationship between two issues in the same workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub issue_id: String,
    pub depends_on_id: String,

    /// Serialised as "type" in JSON.
    #[serde(rename = "type")]
    pub dep_type: DependencyType,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
}

/// Counts of outgoing/incoming dependencies for an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCounts {
    pub dependency_count: i32,
    pub dependent_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_serde_uses_type_key() {
        let dep = Dependency {
            issue_id: "a-111111".into(),
            depends_on_id: "a-222222".into(),
            dep_type: DependencyType::Blocks,
            created_at: Utc::now(),
            created_by: "alice".into(),
        };
        let json = serde_json::to_string(&dep).unwrap();
        assert!(json.contains("\"type\":\"blocks\""));
        let back: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dep_type, DependencyType::Blocks);
    }
}
