//! The composite view returned by `GetTeamContext` (§4.2): issues grouped by
//! their `teammate:<role>` label.

use serde::Serialize;

/// One issue as shown in a team-context grouping.
#[derive(Debug, Clone, Serialize)]
pub struct TeamContextEntry {
    pub id: String,
    pub title: String,
    pub status: String,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_plan: Option<String>,
    pub depends_on: Vec<String>,
}

/// Issues grouped by role, keyed by the `teammate:<role>` suffix (or
/// `unassigned` when no such label is present and an epic scope was given).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamContextView {
    pub groups: std::collections::BTreeMap<String, Vec<TeamContextEntry>>,
}
