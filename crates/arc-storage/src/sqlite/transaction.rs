//! [`SqliteTx`] -- a `Transaction` handle scoped to a single SQLite
//! transaction, and [`SqliteStore::run_in_transaction_impl`] which drives it.

use rusqlite::Connection;

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;
use crate::sqlite::{comments, config, dependencies, issues, labels};
use crate::traits::Transaction;
use arc_core::comment::Comment;
use arc_core::dependency::Dependency;
use arc_core::issue::{Issue, IssueUpdates};

/// Delegates every method to the `_on_conn` free functions in the sibling
/// modules, running them against the connection that owns the open
/// transaction.
pub(crate) struct SqliteTx<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteTx<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Transaction for SqliteTx<'_> {
    fn create_issue(&self, issue: &Issue, actor: &str) -> Result<()> {
        issues::insert_issue(self.conn, issue, actor)
    }

    fn get_issue(&self, id: &str) -> Result<Issue> {
        issues::get_issue_on_conn(self.conn, id)
    }

    fn update_issue(&self, id: &str, updates: &IssueUpdates, actor: &str) -> Result<()> {
        issues::update_issue_on_conn(self.conn, id, updates, actor)
    }

    fn close_issue(&self, id: &str, reason: &str, actor: &str) -> Result<()> {
        issues::close_issue_on_conn(self.conn, id, reason, actor)
    }

    fn reopen_issue(&self, id: &str, actor: &str) -> Result<()> {
        issues::reopen_issue_on_conn(self.conn, id, actor)
    }

    fn delete_issue(&self, id: &str) -> Result<()> {
        issues::delete_issue_on_conn(self.conn, id)
    }

    fn add_dependency(&self, dep: &Dependency) -> Result<()> {
        dependencies::add_dependency_on_conn(self.conn, dep)
    }

    fn remove_dependency(&self, issue_id: &str, depends_on_id: &str, actor: &str) -> Result<()> {
        dependencies::remove_dependency_on_conn(self.conn, issue_id, depends_on_id, actor)
    }

    fn add_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        labels::add_label_on_conn(self.conn, issue_id, label, actor)
    }

    fn remove_label(&self, issue_id: &str, label: &str, actor: &str) -> Result<()> {
        labels::remove_label_on_conn(self.conn, issue_id, label, actor)
    }

    fn add_comment(&self, comment: &Comment) -> Result<Comment> {
        comments::add_comment_on_conn(self.conn, comment)
    }

    fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        config::set_metadata_on_conn(self.conn, key, value)
    }

    fn get_metadata(&self, key: &str) -> Result<String> {
        config::get_metadata_on_conn(self.conn, key)
    }
}

impl SqliteStore {
    /// Runs `f` inside a single SQLite transaction: commits on `Ok`, and
    /// relies on `rusqlite`'s `Drop` impl to roll back if `f` returns `Err`
    /// or panics before reaching the `commit()` call.
    pub fn run_in_transaction_impl(&self, f: &dyn Fn(&dyn Transaction) -> Result<()>) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;

        let handle = SqliteTx::new(&tx);
        f(&handle)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_core::dependency::Dependency;
    use arc_core::enums::DependencyType;
    use arc_core::issue::IssueBuilder;
    use arc_core::workspace::Workspace;
    use chrono::Utc;

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
    fn transaction_commit() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "In tx").id("t-tx1").build();
        store
            .run_in_transaction_impl(&|tx| tx.create_issue(&issue, "alice"))
            .unwrap();

        let got = store.get_issue_impl("t-tx1").unwrap();
        assert_eq!(got.title, "In tx");
    }

    #[test]
    fn transaction_rollback_on_error() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Rolled back")
            .id("t-tx2")
            .build();

        let result = store.run_in_transaction_impl(&|tx| {
            tx.create_issue(&issue, "alice")?;
            Err(StorageError::validation("forced failure"))
        });
        assert!(result.is_err());

        let err = store.get_issue_impl("t-tx2").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn transaction_with_dependencies() {
        let store = test_store();
        let a = IssueBuilder::new("ws-test1", "A").id("t-a").build();
        let b = IssueBuilder::new("ws-test1", "B").id("t-b").build();
        store.create_issue_impl(&a, "alice").unwrap();
        store.create_issue_impl(&b, "alice").unwrap();

        let dep = Dependency {
            issue_id: "t-a".into(),
            depends_on_id: "t-b".into(),
            dep_type: DependencyType::Blocks,
            created_at: Utc::now(),
            created_by: "alice".into(),
        };
        store
            .run_in_transaction_impl(&|tx| tx.add_dependency(&dep))
            .unwrap();

        let deps = store.get_outgoing_dependencies_impl("t-a").unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].depends_on_id, "t-b");
    }
}
