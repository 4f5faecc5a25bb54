//! Issue CRUD operations for [`SqliteStore`].

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

use arc_core::enums::{EventType, IssueType, Status};
use arc_core::filter::IssueFilter;
use arc_core::issue::{Issue, IssueUpdates};

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;

/// All issue columns in a deterministic order for SELECT queries.
pub(crate) const ISSUE_COLUMNS: &str = r#"
    id, workspace_id, title, description,
    status, priority, issue_type, assignee, external_ref, rank,
    created_at, updated_at, closed_at, close_reason
"#;

/// Same as [`ISSUE_COLUMNS`] but prefixed with `issues.`, used in JOINs where
/// `created_at` would otherwise be ambiguous against `dependencies`/`comments`.
pub(crate) const ISSUE_COLUMNS_PREFIXED: &str = r#"
    issues.id, issues.workspace_id, issues.title, issues.description,
    issues.status, issues.priority, issues.issue_type, issues.assignee, issues.external_ref, issues.rank,
    issues.created_at, issues.updated_at, issues.closed_at, issues.close_reason
"#;

/// Deserialises a row into an [`Issue`]. Column order MUST match [`ISSUE_COLUMNS`].
pub(crate) fn scan_issue(row: &Row<'_>) -> rusqlite::Result<Issue> {
    let id: String = row.get("id")?;
    let workspace_id: String = row.get("workspace_id")?;
    let title: String = row.get("title")?;
    let description: String = row.get("description")?;

    let status_str: String = row.get("status")?;
    let priority: i32 = row.get("priority")?;
    let issue_type_str: String = row.get("issue_type")?;
    let assignee: String = row.get("assignee")?;
    let external_ref: Option<String> = row.get("external_ref")?;
    let rank: i32 = row.get("rank")?;

    let created_at_str: String = row.get("created_at")?;
    let updated_at_str: String = row.get("updated_at")?;
    let closed_at_str: Option<String> = row.get("closed_at")?;
    let close_reason: Option<String> = row.get("close_reason")?;

    Ok(Issue {
        id,
        workspace_id,
        title,
        description,
        status: Status::from(status_str),
        priority,
        issue_type: IssueType::from(issue_type_str),
        assignee,
        external_ref,
        rank,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
        closed_at: closed_at_str.as_deref().map(parse_datetime),
        close_reason,
    })
}

/// Formats a `DateTime<Utc>` as ISO 8601 TEXT for SQLite.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses an ISO 8601 TEXT string from SQLite into a `DateTime<Utc>`.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().unwrap_or_else(|_| {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ"))
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .map(|ndt| ndt.and_utc())
            .unwrap_or_else(|_| Utc::now())
    })
}

/// Inserts a single issue into the database using the provided connection.
pub(crate) fn insert_issue(conn: &Connection, issue: &Issue, actor: &str) -> Result<()> {
    let now_str = format_datetime(&Utc::now());
    let created_at_str = format_datetime(&issue.created_at);
    let updated_at_str = format_datetime(&issue.updated_at);
    let closed_at_str = issue.closed_at.as_ref().map(format_datetime);

    conn.execute(
        &format!(
            "INSERT INTO issues ({ISSUE_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14
            )"
        ),
        params![
            issue.id,
            issue.workspace_id,
            issue.title,
            issue.description,
            issue.status.as_str(),
            issue.priority,
            issue.issue_type.as_str(),
            issue.assignee,
            issue.external_ref,
            issue.rank,
            created_at_str,
            updated_at_str,
            closed_at_str,
            issue.close_reason,
        ],
    )
    .map_err(|e| StorageError::from_sqlite_insert(e, format!("issue {} already exists", issue.id)))?;

    emit_event(conn, &issue.id, EventType::Created, actor, None, None, None, &now_str)?;
    Ok(())
}

/// Emits an event row into the events table.
#[allow(clippy::too_many_arguments)]
pub(crate) fn emit_event(
    conn: &Connection,
    issue_id: &str,
    event_type: EventType,
    actor: &str,
    old_value: Option<&str>,
    new_value: Option<&str>,
    comment: Option<&str>,
    created_at: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO events (issue_id, event_type, actor, old_value, new_value, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![issue_id, event_type.as_str(), actor, old_value, new_value, comment, created_at],
    )?;
    Ok(())
}

impl SqliteStore {
    pub fn create_issue_impl(&self, issue: &Issue, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        insert_issue(&conn, issue, actor)
    }

    pub fn get_issue_impl(&self, id: &str) -> Result<Issue> {
        let conn = self.lock_conn()?;
        get_issue_on_conn(&conn, id)
    }

    pub fn update_issue_impl(&self, id: &str, updates: &IssueUpdates, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        update_issue_on_conn(&conn, id, updates, actor)
    }

    pub fn close_issue_impl(&self, id: &str, reason: &str, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        close_issue_on_conn(&conn, id, reason, actor)
    }

    pub fn reopen_issue_impl(&self, id: &str, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        reopen_issue_on_conn(&conn, id, actor)
    }

    pub fn delete_issue_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_issue_on_conn(&conn, id)
    }

    pub fn search_issues_impl(&self, workspace_id: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let conn = self.lock_conn()?;
        search_issues_on_conn(&conn, workspace_id, filter)
    }

    pub fn last_child_number_impl(&self, parent_id: &str) -> Result<i64> {
        let conn = self.lock_conn()?;
        let n: i64 = conn
            .query_row(
                "SELECT last_child FROM child_counters WHERE parent_id = ?1",
                params![parent_id],
                |row| row.get(0),
            )
            .unwrap_or(0);
        Ok(n)
    }

    /// Atomically bumps and returns the next child number for `parent_id`.
    pub fn allocate_child_number_impl(&self, parent_id: &str) -> Result<i64> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO child_counters (parent_id, last_child) VALUES (?1, 1)
             ON CONFLICT(parent_id) DO UPDATE SET last_child = last_child + 1",
            params![parent_id],
        )?;
        let n: i64 = conn.query_row(
            "SELECT last_child FROM child_counters WHERE parent_id = ?1",
            params![parent_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

/// Retrieves a single issue by ID on the given connection.
pub(crate) fn get_issue_on_conn(conn: &Connection, id: &str) -> Result<Issue> {
    let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_issue).map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("issue", id),
        other => StorageError::Query(other),
    })
}

/// Applies partial updates on the given connection.
pub(crate) fn update_issue_on_conn(
    conn: &Connection,
    id: &str,
    updates: &IssueUpdates,
    actor: &str,
) -> Result<()> {
    let now_str = format_datetime(&Utc::now());

    let mut set_clauses: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(ref v) = updates.title {
        set_clauses.push("title = ?".into());
        param_values.push(Box::new(v.clone()));
    }
    if let Some(ref v) = updates.description {
        set_clauses.push("description = ?".into());
        param_values.push(Box::new(v.clone()));
    }
    if let Some(ref v) = updates.status {
        set_clauses.push("status = ?".into());
        param_values.push(Box::new(v.as_str().to_string()));
    }
    if let Some(v) = updates.priority {
        set_clauses.push("priority = ?".into());
        param_values.push(Box::new(v));
    }
    if let Some(ref v) = updates.issue_type {
        set_clauses.push("issue_type = ?".into());
        param_values.push(Box::new(v.as_str().to_string()));
    }
    if let Some(ref v) = updates.assignee {
        set_clauses.push("assignee = ?".into());
        param_values.push(Box::new(v.clone()));
    }
    if let Some(ref v) = updates.external_ref {
        set_clauses.push("external_ref = ?".into());
        param_values.push(Box::new(v.clone()));
    }
    if let Some(v) = updates.rank {
        set_clauses.push("rank = ?".into());
        param_values.push(Box::new(v));
    }

    if set_clauses.is_empty() {
        return Ok(());
    }

    set_clauses.push("updated_at = ?".into());
    param_values.push(Box::new(now_str.clone()));

    let sql = format!("UPDATE issues SET {} WHERE id = ?", set_clauses.join(", "));
    param_values.push(Box::new(id.to_string()));
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

    let affected = conn.execute(&sql, param_refs.as_slice())?;
    if affected == 0 {
        return Err(StorageError::not_found("issue", id));
    }

    emit_event(conn, id, EventType::Updated, actor, None, None, None, &now_str)?;
    Ok(())
}

/// Closes an issue on the given connection. Sets `closed_at`/`close_reason`.
pub(crate) fn close_issue_on_conn(conn: &Connection, id: &str, reason: &str, actor: &str) -> Result<()> {
    let now_str = format_datetime(&Utc::now());

    let affected = conn.execute(
        "UPDATE issues SET status = 'closed', closed_at = ?1, close_reason = ?2, updated_at = ?1
         WHERE id = ?3",
        params![now_str, reason, id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("issue", id));
    }

    emit_event(conn, id, EventType::Closed, actor, None, Some(reason), None, &now_str)?;
    Ok(())
}

/// Reopens an issue on the given connection. Always transitions to `open`
/// unconditionally, clearing `closed_at`/`close_reason` regardless of the
/// status the issue was closed from.
pub(crate) fn reopen_issue_on_conn(conn: &Connection, id: &str, actor: &str) -> Result<()> {
    let now_str = format_datetime(&Utc::now());

    let affected = conn.execute(
        "UPDATE issues SET status = 'open', closed_at = NULL, close_reason = NULL, updated_at = ?1
         WHERE id = ?2",
        params![now_str, id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("issue", id));
    }

    emit_event(conn, id, EventType::Reopened, actor, None, None, None, &now_str)?;
    Ok(())
}

/// Deletes an issue on the given connection. Cascades via FK to dependencies,
/// labels, comments, events, plan links and its own child counter row, and
/// explicitly cascades to every hierarchical descendant (`<id>.<n>`,
/// `<id>.<n>.<m>`, ...) since those are independent rows the FK graph does
/// not otherwise reach (§9).
pub(crate) fn delete_issue_on_conn(conn: &Connection, id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM issues WHERE id LIKE ?1 ESCAPE '\\'",
        params![format!("{}.%", escape_like(id))],
    )?;
    let affected = conn.execute("DELETE FROM issues WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(StorageError::not_found("issue", id));
    }
    Ok(())
}

/// Escapes `%`/`_`/`\` for use inside a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Searches issues within a workspace on the given connection.
pub(crate) fn search_issues_on_conn(
    conn: &Connection,
    workspace_id: &str,
    filter: &IssueFilter,
) -> Result<Vec<Issue>> {
    let mut where_clauses: Vec<String> = vec!["workspace_id = ?1".to_string()];
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(workspace_id.to_string())];
    let mut param_idx = 2;

    if let Some(ref q) = filter.query {
        if !q.is_empty() {
            where_clauses.push(format!("(title LIKE ?{param_idx} OR description LIKE ?{param_idx})"));
            param_values.push(Box::new(format!("%{q}%")));
            param_idx += 1;
        }
    }
    if let Some(ref status) = filter.status {
        where_clauses.push(format!("status = ?{param_idx}"));
        param_values.push(Box::new(status.as_str().to_string()));
        param_idx += 1;
    }
    if let Some(priority) = filter.priority {
        where_clauses.push(format!("priority = ?{param_idx}"));
        param_values.push(Box::new(priority));
        param_idx += 1;
    }
    if let Some(ref issue_type) = filter.issue_type {
        where_clauses.push(format!("issue_type = ?{param_idx}"));
        param_values.push(Box::new(issue_type.as_str().to_string()));
        param_idx += 1;
    }
    if let Some(ref assignee) = filter.assignee {
        where_clauses.push(format!("assignee = ?{param_idx}"));
        param_values.push(Box::new(assignee.clone()));
        param_idx += 1;
    }

    let where_sql = format!("WHERE {}", where_clauses.join(" AND "));
    let limit = filter.limit.filter(|&l| l > 0).unwrap_or(50);
    let offset = filter.offset.filter(|&o| o >= 0).unwrap_or(0);

    let sql = format!(
        "SELECT {ISSUE_COLUMNS} FROM issues {where_sql} ORDER BY created_at DESC LIMIT {limit} OFFSET {offset}"
    );

    let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), scan_issue)?;

    let mut issues = Vec::new();
    for row in rows {
        issues.push(row?);
    }
    let _ = param_idx;
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::store::SqliteStore;
    use arc_core::issue::IssueBuilder;
    use arc_core::workspace::Workspace;

    fn test_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let ws = Workspace {
            id: "ws-test1".into(),
            name: "test".into(),
            path: None,
            description: String::new(),
            prefix: "t".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create_workspace_impl(&ws).unwrap();
        store
    }

    #[test]
    fn create_and_get_issue() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Test issue")
            .id("t-test1")
            .description("A test description")
            .priority(2)
            .build();

        store.create_issue_impl(&issue, "alice").unwrap();

        let got = store.get_issue_impl("t-test1").unwrap();
        assert_eq!(got.title, "Test issue");
        assert_eq!(got.description, "A test description");
        assert_eq!(got.priority, 2);
    }

    #[test]
    fn get_nonexistent_issue_returns_not_found() {
        let store = test_store();
        let err = store.get_issue_impl("t-nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn update_issue_partial() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Original title").id("t-upd1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        let updates = IssueUpdates {
            title: Some("Updated title".into()),
            priority: Some(3),
            ..Default::default()
        };
        store.update_issue_impl("t-upd1", &updates, "bob").unwrap();

        let got = store.get_issue_impl("t-upd1").unwrap();
        assert_eq!(got.title, "Updated title");
        assert_eq!(got.priority, 3);
    }

    #[test]
    fn update_with_no_fields_is_noop() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Untouched").id("t-upd2").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        store
            .update_issue_impl("t-upd2", &IssueUpdates::default(), "bob")
            .unwrap();
        let got = store.get_issue_impl("t-upd2").unwrap();
        assert_eq!(got.title, "Untouched");
    }

    #[test]
    fn close_and_reopen_issue() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "To close").id("t-close1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        store.close_issue_impl("t-close1", "completed", "alice").unwrap();
        let got = store.get_issue_impl("t-close1").unwrap();
        assert_eq!(got.status, Status::Closed);
        assert!(got.closed_at.is_some());
        assert_eq!(got.close_reason.as_deref(), Some("completed"));

        store.reopen_issue_impl("t-close1", "alice").unwrap();
        let got = store.get_issue_impl("t-close1").unwrap();
        assert_eq!(got.status, Status::Open);
        assert!(got.closed_at.is_none());
        assert!(got.close_reason.is_none());
    }

    #[test]
    fn delete_issue() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "To delete").id("t-del1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        store.delete_issue_impl("t-del1").unwrap();

        let err = store.get_issue_impl("t-del1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_issue_cascades_to_hierarchical_children() {
        let store = test_store();
        let parent = IssueBuilder::new("ws-test1", "Parent").id("t-par1").build();
        store.create_issue_impl(&parent, "alice").unwrap();
        let child = IssueBuilder::new("ws-test1", "Child").id("t-par1.1").build();
        store.create_issue_impl(&child, "alice").unwrap();
        let grandchild = IssueBuilder::new("ws-test1", "Grandchild").id("t-par1.1.1").build();
        store.create_issue_impl(&grandchild, "alice").unwrap();

        store.delete_issue_impl("t-par1").unwrap();

        assert!(store.get_issue_impl("t-par1").unwrap_err().is_not_found());
        assert!(store.get_issue_impl("t-par1.1").unwrap_err().is_not_found());
        assert!(store.get_issue_impl("t-par1.1.1").unwrap_err().is_not_found());
    }

    #[test]
    fn search_issues_by_text() {
        let store = test_store();
        let issue1 = IssueBuilder::new("ws-test1", "Fix login bug")
            .id("t-s1")
            .description("Users cannot log in")
            .build();
        let issue2 = IssueBuilder::new("ws-test1", "Add dashboard")
            .id("t-s2")
            .description("New dashboard feature")
            .build();
        store.create_issue_impl(&issue1, "alice").unwrap();
        store.create_issue_impl(&issue2, "alice").unwrap();

        let filter = IssueFilter {
            query: Some("login".into()),
            ..Default::default()
        };
        let results = store.search_issues_impl("ws-test1", &filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "t-s1");
    }

    #[test]
    fn allocate_child_number_increments() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Parent").id("t-parent1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        assert_eq!(store.allocate_child_number_impl("t-parent1").unwrap(), 1);
        assert_eq!(store.allocate_child_number_impl("t-parent1").unwrap(), 2);
        assert_eq!(store.last_child_number_impl("t-parent1").unwrap(), 2);
    }
}
