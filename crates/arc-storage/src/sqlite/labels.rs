//! Label CRUD operations for [`SqliteStore`].
//!
//! `labels` holds the global label vocabulary (name, color, description);
//! `issue_labels` is the per-issue association table.

use chrono::Utc;
use rusqlite::{Connection, params};

use arc_core::comment::{Label, LabelUpdates};
use arc_core::enums::EventType;

use crate::error::{Result, StorageError};
use crate::sqlite::issues::{emit_event, format_datetime};
use crate::sqlite::store::SqliteStore;

pub(crate) fn create_label_on_conn(conn: &Connection, label: &Label) -> Result<()> {
    conn.execute(
        "INSERT INTO labels (name, color, description) VALUES (?1, ?2, ?3)",
        params![label.name, label.color, label.description],
    )
    .map_err(|e| StorageError::from_sqlite_insert(e, format!("label {} already exists", label.name)))?;
    Ok(())
}

/// Associates `label` with `issue_id`. The label must already exist in the
/// global vocabulary -- enforced by the `issue_labels.label_name` FK.
pub(crate) fn add_label_on_conn(conn: &Connection, issue_id: &str, label: &str, actor: &str) -> Result<()> {
    let affected = conn.execute(
        "INSERT OR IGNORE INTO issue_labels (issue_id, label_name) VALUES (?1, ?2)",
        params![issue_id, label],
    )?;
    if affected == 0 {
        return Ok(());
    }

    let now_str = format_datetime(&Utc::now());
    emit_event(conn, issue_id, EventType::LabelAdded, actor, None, Some(label), None, &now_str)?;
    Ok(())
}

/// Removes `label` from `issue_id`. A no-op when the association did not
/// exist -- deliberately not an error, so that repeated removal requests are
/// idempotent (§9).
pub(crate) fn remove_label_on_conn(conn: &Connection, issue_id: &str, label: &str, actor: &str) -> Result<()> {
    let affected = conn.execute(
        "DELETE FROM issue_labels WHERE issue_id = ?1 AND label_name = ?2",
        params![issue_id, label],
    )?;
    if affected == 0 {
        return Ok(());
    }

    let now_str = format_datetime(&Utc::now());
    emit_event(conn, issue_id, EventType::LabelRemoved, actor, Some(label), None, None, &now_str)?;
    Ok(())
}

pub(crate) fn get_labels_on_conn(conn: &Connection, issue_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT label_name FROM issue_labels WHERE issue_id = ?1 ORDER BY label_name",
    )?;
    let rows = stmt.query_map(params![issue_id], |row| row.get::<_, String>(0))?;
    let mut labels = Vec::new();
    for row in rows {
        labels.push(row?);
    }
    Ok(labels)
}

impl SqliteStore {
    pub fn create_label_impl(&self, label: &Label) -> Result<()> {
        let conn = self.lock_conn()?;
        create_label_on_conn(&conn, label)
    }

    pub fn get_label_impl(&self, name: &str) -> Result<Label> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT name, color, description FROM labels WHERE name = ?1",
            params![name],
            |row| {
                Ok(Label {
                    name: row.get(0)?,
                    color: row.get(1)?,
                    description: row.get(2)?,
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("label", name),
            other => StorageError::Query(other),
        })
    }

    pub fn list_labels_impl(&self) -> Result<Vec<Label>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT name, color, description FROM labels ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Label {
                name: row.get(0)?,
                color: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }

    pub fn update_label_impl(&self, name: &str, updates: &LabelUpdates) -> Result<()> {
        let conn = self.lock_conn()?;

        let mut set_clauses: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref v) = updates.color {
            set_clauses.push("color = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if let Some(ref v) = updates.description {
            set_clauses.push("description = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if set_clauses.is_empty() {
            return Ok(());
        }

        let sql = format!("UPDATE labels SET {} WHERE name = ?", set_clauses.join(", "));
        param_values.push(Box::new(name.to_string()));
        let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let affected = conn.execute(&sql, param_refs.as_slice())?;
        if affected == 0 {
            return Err(StorageError::not_found("label", name));
        }
        Ok(())
    }

    pub fn delete_label_impl(&self, name: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM labels WHERE name = ?1", params![name])?;
        if affected == 0 {
            return Err(StorageError::not_found("label", name));
        }
        Ok(())
    }

    pub fn add_label_impl(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        add_label_on_conn(&conn, issue_id, label, actor)
    }

    pub fn remove_label_impl(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        remove_label_on_conn(&conn, issue_id, label, actor)
    }

    pub fn get_labels_impl(&self, issue_id: &str) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        get_labels_on_conn(&conn, issue_id)
    }

    /// Batch label lookup for a set of issues, used when rendering list
    /// views so each issue's labels don't need a separate round trip.
    pub fn labels_for_issues_impl(&self, issue_ids: &[String]) -> Result<Vec<(String, Vec<String>)>> {
        if issue_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock_conn()?;
        let placeholders = issue_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT issue_id, label_name FROM issue_labels WHERE issue_id IN ({placeholders}) ORDER BY issue_id, label_name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let params = rusqlite::params_from_iter(issue_ids.iter());
        let rows = stmt.query_map(params, |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut result: Vec<(String, Vec<String>)> = issue_ids.iter().map(|id| (id.clone(), Vec::new())).collect();
        for row in rows {
            let (issue_id, label) = row?;
            if let Some(entry) = result.iter_mut().find(|(id, _)| *id == issue_id) {
                entry.1.push(label);
            }
        }
        Ok(result)
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

    fn seed_label(store: &SqliteStore, name: &str) {
        store
            .create_label_impl(&Label { name: name.into(), color: None, description: String::new() })
            .unwrap();
    }

    #[test]
    fn add_and_get_labels() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Labeled issue").id("t-lbl1").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        seed_label(&store, "bug");
        seed_label(&store, "critical");

        store.add_label_impl("t-lbl1", "bug", "alice").unwrap();
        store.add_label_impl("t-lbl1", "critical", "alice").unwrap();

        let labels = store.get_labels_impl("t-lbl1").unwrap();
        assert_eq!(labels, vec!["bug".to_string(), "critical".to_string()]);
    }

    #[test]
    fn re_adding_a_label_does_not_duplicate_the_event() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-lbl5").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        seed_label(&store, "dup");

        store.add_label_impl("t-lbl5", "dup", "alice").unwrap();
        store.add_label_impl("t-lbl5", "dup", "alice").unwrap();

        let events = store.get_events_impl("t-lbl5", None).unwrap();
        let added = events.iter().filter(|e| e.event_type == EventType::LabelAdded).count();
        assert_eq!(added, 1);
    }

    #[test]
    fn remove_label_is_idempotent() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-lbl2").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        seed_label(&store, "tech-debt");
        store.add_label_impl("t-lbl2", "tech-debt", "alice").unwrap();

        store.remove_label_impl("t-lbl2", "tech-debt", "alice").unwrap();
        assert!(store.get_labels_impl("t-lbl2").unwrap().is_empty());

        // Second removal is a no-op, not an error.
        store.remove_label_impl("t-lbl2", "tech-debt", "alice").unwrap();
    }

    #[test]
    fn update_label_fields() {
        let store = test_store();
        seed_label(&store, "flaky");

        store
            .update_label_impl(
                "flaky",
                &LabelUpdates {
                    color: Some(Some("#ff0000".into())),
                    description: Some("marks flaky tests".into()),
                },
            )
            .unwrap();

        let got = store.get_label_impl("flaky").unwrap();
        assert_eq!(got.color.as_deref(), Some("#ff0000"));
        assert_eq!(got.description, "marks flaky tests");
    }

    #[test]
    fn delete_label_removes_it() {
        let store = test_store();
        seed_label(&store, "throwaway");
        store.delete_label_impl("throwaway").unwrap();
        assert!(store.get_label_impl("throwaway").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_unknown_label_is_not_found() {
        let store = test_store();
        assert!(store.delete_label_impl("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn labels_for_issues_batch() {
        let store = test_store();
        let a = IssueBuilder::new("ws-test1", "A").id("t-lbl3").build();
        let b = IssueBuilder::new("ws-test1", "B").id("t-lbl4").build();
        store.create_issue_impl(&a, "alice").unwrap();
        store.create_issue_impl(&b, "alice").unwrap();
        seed_label(&store, "p0");
        store.add_label_impl("t-lbl3", "p0", "alice").unwrap();

        let batch = store
            .labels_for_issues_impl(&["t-lbl3".to_string(), "t-lbl4".to_string()])
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].1, vec!["p0".to_string()]);
        assert!(batch[1].1.is_empty());
    }
}
