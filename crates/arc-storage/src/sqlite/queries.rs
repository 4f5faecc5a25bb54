//! Ready-work and blocked-work query algorithms (§4.1).
//!
//! Both queries classify an issue as blocked using the same predicate: an
//! outgoing `blocks` or `parent-child` dependency to an issue whose status
//! is not `closed`. `ready` is the complement of that predicate among
//! open/in_progress issues; `blocked` is the predicate itself, with a count
//! and the list of blocking ids attached.

use chrono::{Duration, Utc};
use rusqlite::params;

use arc_core::enums::SortPolicy;
use arc_core::filter::WorkFilter;
use arc_core::issue::Issue;

use crate::error::Result;
use crate::sqlite::issues::{ISSUE_COLUMNS_PREFIXED, format_datetime, scan_issue};
use crate::sqlite::store::SqliteStore;
use crate::traits::BlockedIssue;

/// Age threshold (§4.1) separating "fresh" from "stale" issues under the
/// `hybrid` sort policy.
const HYBRID_THRESHOLD_DAYS: i64 = 14;

const NOT_BLOCKED_PREDICATE: &str = "
    NOT EXISTS (
        SELECT 1 FROM dependencies d
        JOIN issues blocker ON blocker.id = d.depends_on_id
        WHERE d.issue_id = issues.id
          AND d.type IN ('blocks', 'parent-child')
          AND blocker.status != 'closed'
    )
";

impl SqliteStore {
    pub fn ready_work_impl(&self, workspace_id: &str, filter: &WorkFilter) -> Result<Vec<Issue>> {
        let conn = self.lock_conn()?;

        let mut where_clauses: Vec<String> = vec![
            "issues.workspace_id = ?1".to_string(),
            "issues.status IN ('open', 'in_progress')".to_string(),
            NOT_BLOCKED_PREDICATE.to_string(),
        ];
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(workspace_id.to_string())];
        let mut idx = 2;

        if let Some(ref issue_type) = filter.issue_type {
            where_clauses.push(format!("issues.issue_type = ?{idx}"));
            param_values.push(Box::new(issue_type.as_str().to_string()));
            idx += 1;
        }
        if let Some(priority) = filter.priority {
            where_clauses.push(format!("issues.priority = ?{idx}"));
            param_values.push(Box::new(priority));
            idx += 1;
        }
        if filter.unassigned {
            where_clauses.push("issues.assignee = ''".to_string());
        } else if let Some(ref assignee) = filter.assignee {
            where_clauses.push(format!("issues.assignee = ?{idx}"));
            param_values.push(Box::new(assignee.clone()));
            idx += 1;
        }
        let _ = idx;

        let where_sql = where_clauses.join(" AND ");
        let order_sql = order_by_for_policy(filter.sort_policy.clone());
        let limit = filter.limit.filter(|&l| l > 0).unwrap_or(50);

        let sql = format!(
            "SELECT {ISSUE_COLUMNS_PREFIXED} FROM issues WHERE {where_sql} ORDER BY {order_sql} LIMIT {limit}"
        );

        let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), scan_issue)?;
        let mut issues = Vec::new();
        for row in rows {
            issues.push(row?);
        }
        Ok(issues)
    }

    pub fn blocked_work_impl(&self, workspace_id: &str) -> Result<Vec<BlockedIssue>> {
        let conn = self.lock_conn()?;

        let sql = format!(
            "SELECT {ISSUE_COLUMNS_PREFIXED} FROM issues
             WHERE issues.workspace_id = ?1
               AND issues.status IN ('open', 'in_progress')
               AND NOT ({NOT_BLOCKED_PREDICATE})
             ORDER BY issues.created_at ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![workspace_id], scan_issue)?;

        let mut result = Vec::new();
        for row in rows {
            let issue = row?;
            let mut blocker_stmt = conn.prepare(
                "SELECT d.depends_on_id FROM dependencies d
                 JOIN issues blocker ON blocker.id = d.depends_on_id
                 WHERE d.issue_id = ?1 AND d.type IN ('blocks', 'parent-child')
                   AND blocker.status != 'closed'",
            )?;
            let blocked_by: Vec<String> = blocker_stmt
                .query_map(params![issue.id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            result.push(BlockedIssue {
                blocked_by_count: blocked_by.len() as i64,
                blocked_by,
                issue,
            });
        }
        Ok(result)
    }
}

/// Builds the `ORDER BY` clause for a given sort policy.
///
/// `hybrid` partitions on an `is_stale` boolean (issues older than
/// [`HYBRID_THRESHOLD_DAYS`]) so stale issues are always appended after
/// fresh ones regardless of priority, preventing starvation (§4.1). Within
/// each partition the `CASE` arms for the other policy's keys evaluate to
/// `NULL`, which ties and falls through to `created_at` harmlessly since
/// the partition itself has already separated the two groups.
fn order_by_for_policy(policy: SortPolicy) -> String {
    match policy {
        SortPolicy::Priority => "issues.priority ASC, issues.rank ASC, issues.created_at ASC".to_string(),
        SortPolicy::Oldest => "issues.created_at ASC, issues.id ASC".to_string(),
        _ => {
            let threshold = format_datetime(&(Utc::now() - Duration::days(HYBRID_THRESHOLD_DAYS)));
            format!(
                "(CASE WHEN issues.created_at < '{threshold}' THEN 1 ELSE 0 END) ASC, \
                 (CASE WHEN issues.created_at >= '{threshold}' THEN issues.priority END) ASC, \
                 (CASE WHEN issues.created_at >= '{threshold}' THEN issues.rank END) ASC, \
                 issues.created_at ASC"
            )
        }
    }
}
