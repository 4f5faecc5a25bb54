//! Comment and Event CRUD operations for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, params};

use arc_core::comment::{Comment, Event};
use arc_core::enums::{CommentType, EventType};

use crate::error::{Result, StorageError};
use crate::sqlite::issues::{emit_event, format_datetime, parse_datetime};
use crate::sqlite::store::SqliteStore;

/// Adds a comment on the given connection, returning the created comment.
/// Also emits a "commented" event, except for plan-typed comments, which
/// carry their own history rather than an event-log entry (§4.2).
pub(crate) fn add_comment_on_conn(conn: &Connection, comment: &Comment) -> Result<Comment> {
    let now_str = format_datetime(&Utc::now());

    conn.execute(
        "INSERT INTO comments (issue_id, author, text, comment_type, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![comment.issue_id, comment.author, comment.text, comment.comment_type.as_str(), now_str],
    )?;
    let id = conn.last_insert_rowid();

    if comment.comment_type != CommentType::Plan {
        emit_event(
            conn,
            &comment.issue_id,
            EventType::Commented,
            &comment.author,
            None,
            None,
            Some(&comment.text),
            &now_str,
        )?;
    }

    Ok(Comment {
        id,
        issue_id: comment.issue_id.clone(),
        author: comment.author.clone(),
        text: comment.text.clone(),
        comment_type: comment.comment_type.clone(),
        created_at: parse_datetime(&now_str),
        updated_at: parse_datetime(&now_str),
    })
}

fn scan_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        issue_id: row.get("issue_id")?,
        author: row.get("author")?,
        text: row.get("text")?,
        comment_type: CommentType::from(row.get::<_, String>("comment_type")?.as_str()),
        created_at: parse_datetime(&row.get::<_, String>("created_at")?),
        updated_at: parse_datetime(&row.get::<_, String>("updated_at")?),
    })
}

pub(crate) fn get_comments_on_conn(conn: &Connection, issue_id: &str) -> Result<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT id, issue_id, author, text, comment_type, created_at, updated_at
         FROM comments WHERE issue_id = ?1 ORDER BY created_at ASC",
    )?;
    let rows = stmt.query_map(params![issue_id], scan_comment)?;
    let mut comments = Vec::new();
    for row in rows {
        comments.push(row?);
    }
    Ok(comments)
}

fn scan_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        issue_id: row.get("issue_id")?,
        event_type: EventType::from(row.get::<_, String>("event_type")?.as_str()),
        actor: row.get("actor")?,
        old_value: row.get("old_value")?,
        new_value: row.get("new_value")?,
        comment: row.get("comment")?,
        created_at: parse_datetime(&row.get::<_, String>("created_at")?),
    })
}

impl SqliteStore {
    pub fn add_comment_impl(&self, comment: &Comment) -> Result<Comment> {
        let conn = self.lock_conn()?;
        add_comment_on_conn(&conn, comment)
    }

    pub fn get_comments_impl(&self, issue_id: &str) -> Result<Vec<Comment>> {
        let conn = self.lock_conn()?;
        get_comments_on_conn(&conn, issue_id)
    }

    /// Returns the most recent inline plan comment for an issue, if any.
    pub fn get_latest_plan_impl(&self, issue_id: &str) -> Result<Option<Comment>> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT id, issue_id, author, text, comment_type, created_at, updated_at
             FROM comments WHERE issue_id = ?1 AND comment_type = 'plan'
             ORDER BY created_at DESC LIMIT 1",
            params![issue_id],
            scan_comment,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StorageError::Query(other)),
        }
    }

    /// Returns the full, reverse-chronological history of inline plan
    /// comments for an issue.
    pub fn get_plan_history_impl(&self, issue_id: &str) -> Result<Vec<Comment>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, issue_id, author, text, comment_type, created_at, updated_at
             FROM comments WHERE issue_id = ?1 AND comment_type = 'plan'
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![issue_id], scan_comment)?;
        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }

    pub fn get_events_impl(&self, issue_id: &str, limit: Option<i64>) -> Result<Vec<Event>> {
        let conn = self.lock_conn()?;
        let limit = limit.filter(|l| *l > 0).unwrap_or(50);
        let mut stmt = conn.prepare(
            "SELECT id, issue_id, event_type, actor, old_value, new_value, comment, created_at
             FROM events WHERE issue_id = ?1 ORDER BY created_at DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![issue_id, limit], scan_event)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    pub fn get_comment_impl(&self, id: i64) -> Result<Comment> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT id, issue_id, author, text, comment_type, created_at, updated_at
             FROM comments WHERE id = ?1",
            params![id],
            scan_comment,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("comment", id.to_string()),
            other => StorageError::Query(other),
        })
    }

    /// Updates a comment's text. Plan-typed comments are append-only history
    /// entries and are not editable through this path (§3).
    pub fn update_comment_impl(&self, id: i64, text: &str) -> Result<Comment> {
        let conn = self.lock_conn()?;
        let now_str = format_datetime(&Utc::now());
        let affected = conn.execute(
            "UPDATE comments SET text = ?1, updated_at = ?2 WHERE id = ?3 AND comment_type = 'comment'",
            params![text, now_str, id],
        )?;
        if affected == 0 {
            return Err(StorageError::not_found("comment", id.to_string()));
        }
        drop(conn);
        self.get_comment_impl(id)
    }

    pub fn delete_comment_impl(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        let affected = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StorageError::not_found("comment", id.to_string()));
        }
        Ok(())
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

    fn comment(issue_id: &str, text: &str, ty: CommentType) -> Comment {
        Comment {
            id: 0,
            issue_id: issue_id.into(),
            author: "alice".into(),
            text: text.into(),
            comment_type: ty,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn add_and_get_comment() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-cmt1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        let created = store
            .add_comment_impl(&comment("t-cmt1", "Looks good", CommentType::Comment))
            .unwrap();
        assert_eq!(created.text, "Looks good");
        assert!(created.id > 0);

        let comments = store.get_comments_impl("t-cmt1").unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Looks good");
    }

    #[test]
    fn plan_comments_do_not_emit_commented_event() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-cmt2").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        store
            .add_comment_impl(&comment("t-cmt2", "plan v1", CommentType::Plan))
            .unwrap();

        let events = store.get_events_impl("t-cmt2", None).unwrap();
        assert!(events.iter().all(|e| e.event_type != EventType::Commented));
    }

    #[test]
    fn plan_history_is_reverse_chronological() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-plan1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        store.add_comment_impl(&comment("t-plan1", "v1", CommentType::Plan)).unwrap();
        store.add_comment_impl(&comment("t-plan1", "v2", CommentType::Plan)).unwrap();

        let latest = store.get_latest_plan_impl("t-plan1").unwrap().unwrap();
        assert_eq!(latest.text, "v2");

        let history = store.get_plan_history_impl("t-plan1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "v2");
    }

    #[test]
    fn get_events_includes_created() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-evt1").build();
        store.create_issue_impl(&issue, "alice").unwrap();

        let events = store.get_events_impl("t-evt1", None).unwrap();
        assert!(events.iter().any(|e| e.event_type == EventType::Created));
    }

    #[test]
    fn update_and_delete_comment() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-cmt3").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        let created = store
            .add_comment_impl(&comment("t-cmt3", "first draft", CommentType::Comment))
            .unwrap();

        let updated = store.update_comment_impl(created.id, "revised text").unwrap();
        assert_eq!(updated.text, "revised text");
        assert_eq!(store.get_comment_impl(created.id).unwrap().text, "revised text");

        store.delete_comment_impl(created.id).unwrap();
        assert!(store.get_comment_impl(created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn plan_comments_are_not_editable_via_update_comment() {
        let store = test_store();
        let issue = IssueBuilder::new("ws-test1", "Issue").id("t-cmt4").build();
        store.create_issue_impl(&issue, "alice").unwrap();
        let created = store
            .add_comment_impl(&comment("t-cmt4", "plan v1", CommentType::Plan))
            .unwrap();

        assert!(store.update_comment_impl(created.id, "rewritten").unwrap_err().is_not_found());
    }
}
