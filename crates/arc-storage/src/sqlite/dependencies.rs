//! Dependency CRUD operations for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, params};

use arc_core::dependency::{Dependency, DependencyCounts};
use arc_core::enums::{DependencyType, EventType};
use arc_core::validation::validate_dependency_endpoints;

use crate::error::{Result, StorageError};
use crate::sqlite::issues::{emit_event, format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

/// Inserts a dependency edge on the given connection.
///
/// Endpoint validation is limited to rejecting self-loops (§9): unlike the
/// teacher's BFS cycle walk over the whole blocking subgraph, a longer cycle
/// through several issues is accepted.
pub(crate) fn add_dependency_on_conn(conn: &Connection, dep: &Dependency) -> Result<()> {
    validate_dependency_endpoints(&dep.issue_id, &dep.depends_on_id)
        .map_err(|e| StorageError::validation(e.to_string()))?;

    let now_str = format_datetime(&Utc::now());
    let created_at_str = format_datetime(&dep.created_at);

    conn.execute(
        "INSERT OR REPLACE INTO dependencies (issue_id, depends_on_id, type, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![dep.issue_id, dep.depends_on_id, dep.dep_type.as_str(), created_at_str, dep.created_by],
    )?;

    emit_event(
        conn,
        &dep.issue_id,
        EventType::DependencyAdded,
        &dep.created_by,
        None,
        Some(&dep.depends_on_id),
        Some(dep.dep_type.as_str()),
        &now_str,
    )?;

    Ok(())
}

/// Removes a dependency edge on the given connection.
pub(crate) fn remove_dependency_on_conn(conn: &Connection, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM dependencies WHERE issue_id = ?1 AND depends_on_id = ?2",
        params![issue_id, depends_on_id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("dependency", format!("{issue_id} -> {depends_on_id}")));
    }

    let now_str = format_datetime(&Utc::now());
    emit_event(
        conn,
        issue_id,
        EventType::DependencyRemoved,
        actor,
        Some(depends_on_id),
        None,
        None,
        &now_str,
    )?;
    Ok(())
}

fn scan_dependency(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dependency> {
    Ok(Dependency {
        issue_id: row.get("issue_id")?,
        depends_on_id: row.get("depends_on_id")?,
        dep_type: DependencyType::from(row.get::<_, String>("type")?.as_str()),
        created_at: parse_datetime(&row.get::<_, String>("created_at")?),
        created_by: row.get("created_by")?,
    })
}

pub(crate) fn get_outgoing_on_conn(conn: &Connection, issue_id: &str) -> Result<Vec<Dependency>> {
    let mut stmt = conn.prepare(
        "SELECT issue_id, depends_on_id, type, created_at, created_by
         FROM dependencies WHERE issue_id = ?1",
    )?;
    let rows = stmt.query_map(params![issue_id], scan_dependency)?;
    let mut deps = Vec::new();
    for row in rows {
        deps.push(row?);
    }
    Ok(deps)
}

pub(crate) fn get_incoming_on_conn(conn: &Connection, issue_id: &str) -> Result<Vec<Dependency>> {
    let mut stmt = conn.prepare(
        "SELECT issue_id, depends_on_id, type, created_at, created_by
         FROM dependencies WHERE depends_on_id = ?1",
    )?;
    let rows = stmt.query_map(params![issue_id], scan_dependency)?;
    let mut deps = Vec::new();
    for row in rows {
        deps.push(row?);
    }
    Ok(deps)
}

impl SqliteStore {
    pub fn add_dependency_impl(&self, dep: &Dependency) -> Result<()> {
        let conn = self.lock_conn()?;
        add_dependency_on_conn(&conn, dep)
    }

    pub fn remove_dependency_impl(&self, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        remove_dependency_on_conn(&conn, issue_id, depends_on_id, actor)
    }

    pub fn get_outgoing_dependencies_impl(&self, issue_id: &str) -> Result<Vec<Dependency>> {
        let conn = self.lock_conn()?;
        get_outgoing_on_conn(&conn, issue_id)
    }

    pub fn get_incoming_dependencies_impl(&self, issue_id: &str) -> Result<Vec<Dependency>> {
        let conn = self.lock_conn()?;
        get_incoming_on_conn(&conn, issue_id)
    }

    pub fn dependency_counts_impl(&self, issue_id: &str) -> Result<DependencyCounts> {
        let conn = self.lock_conn()?;
        let dependency_count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM dependencies WHERE issue_id = ?1",
            params![issue_id],
            |row| row.get(0),
        )?;
        let dependent_count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM dependencies WHERE depends_on_id = ?1",
            params![issue_id],
            |row| row.get(0),
        )?;
        Ok(DependencyCounts { dependency_count, dependent_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn make_dep(issue_id: &str, depends_on_id: &str) -> Dependency {
        Dependency {
            issue_id: issue_id.into(),
            depends_on_id: depends_on_id.into(),
            dep_type: DependencyType::Blocks,
            created_at: Utc::now(),
            created_by: "alice".into(),
        }
    }

    #[test]
    fn add_and_get_dependency() {
        let store = test_store();
        let a = IssueBuilder::new("ws-test1", "A").id("t-a").build();
        let b = IssueBuilder::new("ws-test1", "B").id("t-b").build();
        store.create_issue_impl(&a, "alice").unwrap();
        store.create_issue_impl(&b, "alice").unwrap();

        store.add_dependency_impl(&make_dep("t-a", "t-b")).unwrap();

        let outgoing = store.get_outgoing_dependencies_impl("t-a").unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].depends_on_id, "t-b");

        let incoming = store.get_incoming_dependencies_impl("t-b").unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].issue_id, "t-a");
    }

    #[test]
    fn self_dependency_rejected() {
        let store = test_store();
        let a = IssueBuilder::new("ws-test1", "A").id("t-self").build();
        store.create_issue_impl(&a, "alice").unwrap();

        let err = store.add_dependency_impl(&make_dep("t-self", "t-self")).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn remove_nonexistent_dependency_is_not_found() {
        let store = test_store();
        let err = store.remove_dependency_impl("t-a", "t-b", "alice").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn dependency_counts() {
        let store = test_store();
        let a = IssueBuilder::new("ws-test1", "A").id("t-cnt-a").build();
        let b = IssueBuilder::new("ws-test1", "B").id("t-cnt-b").build();
        store.create_issue_impl(&a, "alice").unwrap();
        store.create_issue_impl(&b, "alice").unwrap();
        store.add_dependency_impl(&make_dep("t-cnt-a", "t-cnt-b")).unwrap();

        let counts = store.dependency_counts_impl("t-cnt-a").unwrap();
        assert_eq!(counts.dependency_count, 1);
        assert_eq!(counts.dependent_count, 0);

        let counts_b = store.dependency_counts_impl("t-cnt-b").unwrap();
        assert_eq!(counts_b.dependency_count, 0);
        assert_eq!(counts_b.dependent_count, 1);
    }
}
