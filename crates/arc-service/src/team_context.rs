//! Team-context view (§4.2): issues grouped by their `teammate:<role>`
//! label, optionally scoped to an epic's direct children.

use std::collections::BTreeMap;

use arc_core::enums::{DependencyType, Status};
use arc_core::error::Result;
use arc_core::filter::IssueFilter;
use arc_core::team_context::{TeamContextEntry, TeamContextView};

use crate::Service;

const TEAMMATE_PREFIX: &str = "teammate:";
const UNASSIGNED_GROUP: &str = "unassigned";

/// Upper bound used in place of pagination for this view -- team context is
/// meant to be read whole, not paged (§4.2).
const ALL_ISSUES_LIMIT: i32 = 10_000;

impl Service {
    pub fn get_team_context(&self, workspace_id: &str, epic_id: Option<&str>) -> Result<TeamContextView> {
        self.store.get_workspace(workspace_id)?;

        let issues = match epic_id {
            Some(epic_id) => {
                self.get_issue(workspace_id, epic_id)?;
                let incoming = self.store.get_incoming_dependencies(epic_id)?;
                let child_ids: Vec<String> = incoming
                    .into_iter()
                    .filter(|d| d.dep_type == DependencyType::ParentChild)
                    .map(|d| d.issue_id)
                    .collect();
                child_ids
                    .into_iter()
                    .map(|id| self.store.get_issue(&id))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let filter = IssueFilter { limit: Some(ALL_ISSUES_LIMIT), ..Default::default() };
                self.store
                    .search_issues(workspace_id, &filter)?
                    .into_iter()
                    .filter(|issue| issue.status != Status::Closed)
                    .collect()
            }
        };

        let ids: Vec<String> = issues.iter().map(|i| i.id.clone()).collect();
        let labels_by_issue: BTreeMap<String, Vec<String>> = self.store.labels_for_issues(&ids)?.into_iter().collect();

        let mut view = TeamContextView::default();
        for issue in issues {
            let role = labels_by_issue
                .get(&issue.id)
                .into_iter()
                .flatten()
                .find_map(|label| label.strip_prefix(TEAMMATE_PREFIX));

            let group = match (role, epic_id.is_some()) {
                (Some(role), _) => role.to_string(),
                (None, true) => UNASSIGNED_GROUP.to_string(),
                // Without an epic scope, unlabeled issues are skipped entirely (§4.2).
                (None, false) => continue,
            };

            let inline_plan = self.store.get_latest_plan(&issue.id)?.map(|c| c.text);
            let depends_on = self
                .store
                .get_outgoing_dependencies(&issue.id)?
                .into_iter()
                .map(|d| d.depends_on_id)
                .collect();

            view.groups.entry(group).or_default().push(TeamContextEntry {
                id: issue.id.clone(),
                title: issue.title,
                status: issue.status.as_str().to_string(),
                priority: issue.priority,
                inline_plan,
                depends_on,
            });
        }

        Ok(view)
    }
}
