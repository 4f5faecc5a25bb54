//! Workspace CRUD and per-workspace statistics for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, Row, params};

use arc_core::workspace::{Workspace, WorkspaceUpdates};

use crate::error::{Result, StorageError};
use crate::sqlite::issues::{format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;
use crate::traits::Statistics;

const WORKSPACE_COLUMNS: &str = "id, name, path, description, prefix, created_at, updated_at";

fn scan_workspace(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(Workspace {
        id: row.get("id")?,
        name: row.get("name")?,
        path: row.get("path")?,
        description: row.get("description")?,
        prefix: row.get("prefix")?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

pub(crate) fn create_workspace_on_conn(conn: &Connection, ws: &Workspace) -> Result<()> {
    let created_at_str = format_datetime(&ws.created_at);
    let updated_at_str = format_datetime(&ws.updated_at);

    conn.execute(
        &format!(
            "INSERT INTO workspaces ({WORKSPACE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ),
        params![
            ws.id,
            ws.name,
            ws.path,
            ws.description,
            ws.prefix,
            created_at_str,
            updated_at_str,
        ],
    )
    .map_err(|e| StorageError::from_sqlite_insert(e, format!("workspace named {} already exists", ws.name)))?;
    Ok(())
}

pub(crate) fn get_workspace_on_conn(conn: &Connection, id: &str) -> Result<Workspace> {
    let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_workspace).map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("workspace", id),
        other => StorageError::Query(other),
    })
}

impl SqliteStore {
    pub fn create_workspace_impl(&self, ws: &Workspace) -> Result<()> {
        let conn = self.lock_conn()?;
        create_workspace_on_conn(&conn, ws)
    }

    pub fn get_workspace_impl(&self, id: &str) -> Result<Workspace> {
        let conn = self.lock_conn()?;
        get_workspace_on_conn(&conn, id)
    }

    pub fn get_workspace_by_name_impl(&self, name: &str) -> Result<Workspace> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE name = ?1");
        conn.query_row(&sql, params![name], scan_workspace).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("workspace", name),
            other => StorageError::Query(other),
        })
    }

    pub fn list_workspaces_impl(&self) -> Result<Vec<Workspace>> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces ORDER BY created_at ASC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], scan_workspace)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update_workspace_impl(&self, id: &str, updates: &WorkspaceUpdates) -> Result<()> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());

        let mut set_clauses: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref v) = updates.name {
            set_clauses.push("name = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if let Some(ref v) = updates.path {
            set_clauses.push("path = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if let Some(ref v) = updates.description {
            set_clauses.push("description = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if let Some(ref v) = updates.prefix {
            set_clauses.push("prefix = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if set_clauses.is_empty() {
            return Ok(());
        }

        set_clauses.push("updated_at = ?".into());
        param_values.push(Box::new(now_str));

        let sql = format!("UPDATE workspaces SET {} WHERE id = ?", set_clauses.join(", "));
        param_values.push(Box::new(id.to_string()));
        let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let affected = conn
            .execute(&sql, param_refs.as_slice())
            .map_err(|e| StorageError::from_sqlite_insert(e, "workspace name already in use"))?;
        if affected == 0 {
            return Err(StorageError::not_found("workspace", id));
        }
        Ok(())
    }

    /// Deletes a workspace. Foreign keys with `ON DELETE CASCADE` take care
    /// of issues, dependencies, labels links, comments, shared plans, plan
    /// links, events, and child counters scoped to it.
    pub fn delete_workspace_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM workspaces WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::not_found("workspace", id));
        }
        Ok(())
    }

    /// Per-workspace aggregate counts and average lead time (§4.1).
    pub fn workspace_statistics_impl(&self, workspace_id: &str) -> Result<Statistics> {
        let conn = self.lock_conn()?;

        let mut stats = Statistics::default();
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM issues WHERE workspace_id = ?1 GROUP BY status")?;
        let rows = stmt.query_map(params![workspace_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            stats.total += count;
            match status.as_str() {
                "open" => stats.open = count,
                "in_progress" => stats.in_progress = count,
                "blocked" => stats.blocked = count,
                "deferred" => stats.deferred = count,
                "closed" => stats.closed = count,
                _ => {}
            }
        }

        stats.ready_count = conn.query_row(
            "SELECT COUNT(*) FROM issues
             WHERE workspace_id = ?1 AND status IN ('open', 'in_progress')
             AND NOT EXISTS (
                 SELECT 1 FROM dependencies d
                 JOIN issues blocker ON blocker.id = d.depends_on_id
                 WHERE d.issue_id = issues.id
                   AND d.type IN ('blocks', 'parent-child')
                   AND blocker.status != 'closed'
             )",
            params![workspace_id],
            |row| row.get(0),
        )?;

        let avg_hours: Option<f64> = conn.query_row(
            "SELECT AVG((julianday(closed_at) - julianday(created_at)) * 24.0)
             FROM issues WHERE workspace_id = ?1 AND closed_at IS NOT NULL",
            params![workspace_id],
            |row| row.get(0),
        )?;
        stats.average_lead_time_hours = avg_hours;

        Ok(stats)
    }
}
