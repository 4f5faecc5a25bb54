//! Shared plan CRUD and issue-linking for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, Row, params};

use arc_core::plan::{SharedPlan, SharedPlanUpdates};

use crate::error::{Result, StorageError};
use crate::sqlite::issues::{format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

const PLAN_COLUMNS: &str = "id, workspace_id, title, content, created_at, updated_at";

fn scan_plan(row: &Row<'_>) -> rusqlite::Result<SharedPlan> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(SharedPlan {
        id: row.get("id")?,
        workspace_id: row.get("workspace_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

pub(crate) fn get_plan_on_conn(conn: &Connection, id: &str) -> Result<SharedPlan> {
    let sql = format!("SELECT {PLAN_COLUMNS} FROM shared_plans WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_plan).map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("plan", id),
        other => StorageError::Query(other),
    })
}

impl SqliteStore {
    pub fn create_plan_impl(&self, plan: &SharedPlan) -> Result<()> {
        let conn = self.lock_conn()?;
        let created_at_str = format_datetime(&plan.created_at);
        let updated_at_str = format_datetime(&plan.updated_at);
        conn.execute(
            &format!("INSERT INTO shared_plans ({PLAN_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![plan.id, plan.workspace_id, plan.title, plan.content, created_at_str, updated_at_str],
        )
        .map_err(|e| StorageError::from_sqlite_insert(e, format!("plan {} already exists", plan.id)))?;
        Ok(())
    }

    pub fn get_plan_impl(&self, id: &str) -> Result<SharedPlan> {
        let conn = self.lock_conn()?;
        get_plan_on_conn(&conn, id)
    }

    pub fn list_plans_impl(&self, workspace_id: &str) -> Result<Vec<SharedPlan>> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {PLAN_COLUMNS} FROM shared_plans WHERE workspace_id = ?1 ORDER BY created_at DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![workspace_id], scan_plan)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update_plan_impl(&self, id: &str, updates: &SharedPlanUpdates) -> Result<()> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());

        let mut set_clauses: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(ref v) = updates.title {
            set_clauses.push("title = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if let Some(ref v) = updates.content {
            set_clauses.push("content = ?".into());
            param_values.push(Box::new(v.clone()));
        }
        if set_clauses.is_empty() {
            return Ok(());
        }

        set_clauses.push("updated_at = ?".into());
        param_values.push(Box::new(now_str));

        let sql = format!("UPDATE shared_plans SET {} WHERE id = ?", set_clauses.join(", "));
        param_values.push(Box::new(id.to_string()));
        let param_refs: Vec<&dyn rusqlite::types::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let affected = conn.execute(&sql, param_refs.as_slice())?;
        if affected == 0 {
            return Err(StorageError::not_found("plan", id));
        }
        Ok(())
    }

    pub fn delete_plan_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM shared_plans WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::not_found("plan", id));
        }
        Ok(())
    }

    /// Links a plan to an issue. Idempotent: re-linking an already-linked
    /// pair is a no-op, matching the `UNIQUE (issue_id, plan_id)` constraint.
    pub fn link_plan_impl(&self, issue_id: &str, plan_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());
        conn.execute(
            "INSERT OR IGNORE INTO plan_issue_link (issue_id, plan_id, created_at) VALUES (?1, ?2, ?3)",
            params![issue_id, plan_id, now_str],
        )?;
        Ok(())
    }

    /// Unlinks a plan from an issue. A no-op when the link did not exist,
    /// matching the idempotence the label association path uses (§8).
    pub fn unlink_plan_impl(&self, issue_id: &str, plan_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "DELETE FROM plan_issue_link WHERE issue_id = ?1 AND plan_id = ?2",
            params![issue_id, plan_id],
        )?;
        Ok(())
    }

    pub fn plans_for_issue_impl(&self, issue_id: &str) -> Result<Vec<SharedPlan>> {
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM shared_plans
             JOIN plan_issue_link ON plan_issue_link.plan_id = shared_plans.id
             WHERE plan_issue_link.issue_id = ?1
             ORDER BY plan_issue_link.created_at ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![issue_id], scan_plan)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
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

    fn make_plan(id: &str, title: &str) -> SharedPlan {
        SharedPlan {
            id: id.into(),
            workspace_id: "ws-test1".into(),
            title: title.into(),
            content: "do the thing".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_plan() {
        let store = test_store();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();
        let got = store.get_plan_impl("plan.abc12").unwrap();
        assert_eq!(got.title, "Rollout");
    }

    #[test]
    fn list_plans_scoped_to_workspace() {
        let store = test_store();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();
        let plans = store.list_plans_impl("ws-test1").unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[test]
    fn update_plan_fields() {
        let store = test_store();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();
        store
            .update_plan_impl(
                "plan.abc12",
                &SharedPlanUpdates { title: Some("Rollout v2".into()), content: None },
            )
            .unwrap();
        assert_eq!(store.get_plan_impl("plan.abc12").unwrap().title, "Rollout v2");
    }

    #[test]
    fn link_unlink_plan_roundtrips() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-plan-link1").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();

        store.link_plan_impl("t-plan-link1", "plan.abc12").unwrap();
        assert_eq!(store.plans_for_issue_impl("t-plan-link1").unwrap().len(), 1);

        store.unlink_plan_impl("t-plan-link1", "plan.abc12").unwrap();
        assert!(store.plans_for_issue_impl("t-plan-link1").unwrap().is_empty());

        // Second unlink is a no-op, not an error.
        store.unlink_plan_impl("t-plan-link1", "plan.abc12").unwrap();
    }

    #[test]
    fn relinking_is_idempotent() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-plan-link2").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();

        store.link_plan_impl("t-plan-link2", "plan.abc12").unwrap();
        store.link_plan_impl("t-plan-link2", "plan.abc12").unwrap();
        assert_eq!(store.plans_for_issue_impl("t-plan-link2").unwrap().len(), 1);
    }

    #[test]
    fn delete_plan_removes_it() {
        let store = test_store();
        store.create_plan_impl(&make_plan("plan.abc12", "Rollout")).unwrap();
        store.delete_plan_impl("plan.abc12").unwrap();
        assert!(store.get_plan_impl("plan.abc12").unwrap_err().is_not_found());
    }
}
