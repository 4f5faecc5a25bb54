//! Schema definition and migration bookkeeping for the SQLite backend.

/// Bumped whenever `SCHEMA_STATEMENTS` changes in a way that requires a
/// fresh database (additive changes after v1 go through `MIGRATIONS`
/// instead).
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// DDL executed once, in order, against a freshly created database.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS workspaces (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL UNIQUE,
        path        TEXT,
        description TEXT NOT NULL DEFAULT '',
        prefix      TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS issues (
        id            TEXT PRIMARY KEY,
        workspace_id  TEXT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
        title         TEXT NOT NULL,
        description   TEXT NOT NULL DEFAULT '',
        status        TEXT NOT NULL DEFAULT 'open',
        priority      INTEGER NOT NULL DEFAULT 2,
        issue_type    TEXT NOT NULL DEFAULT 'task',
        assignee      TEXT NOT NULL DEFAULT '',
        external_ref  TEXT,
        rank          INTEGER NOT NULL DEFAULT 0,
        created_at    TEXT NOT NULL,
        updated_at    TEXT NOT NULL,
        closed_at     TEXT,
        close_reason  TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_issues_workspace ON issues(workspace_id)",
    "CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(workspace_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_issues_priority ON issues(priority)",
    "CREATE INDEX IF NOT EXISTS idx_issues_type ON issues(issue_type)",
    "CREATE INDEX IF NOT EXISTS idx_issues_assignee ON issues(assignee)",
    "CREATE INDEX IF NOT EXISTS idx_issues_created_at ON issues(created_at)",
    "CREATE TABLE IF NOT EXISTS dependencies (
        issue_id       TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        depends_on_id  TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        type           TEXT NOT NULL,
        created_at     TEXT NOT NULL,
        created_by     TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (issue_id, depends_on_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_deps_issue ON dependencies(issue_id)",
    "CREATE INDEX IF NOT EXISTS idx_deps_depends_on ON dependencies(depends_on_id)",
    "CREATE INDEX IF NOT EXISTS idx_deps_depends_on_type ON dependencies(depends_on_id, type)",
    "CREATE TABLE IF NOT EXISTS labels (
        name        TEXT PRIMARY KEY,
        color       TEXT,
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS issue_labels (
        issue_id   TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        label_name TEXT NOT NULL REFERENCES labels(name) ON DELETE CASCADE,
        UNIQUE (issue_id, label_name)
    )",
    "CREATE INDEX IF NOT EXISTS idx_issue_labels_issue ON issue_labels(issue_id)",
    "CREATE INDEX IF NOT EXISTS idx_issue_labels_label ON issue_labels(label_name)",
    "CREATE TABLE IF NOT EXISTS comments (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id     TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        author       TEXT NOT NULL,
        text         TEXT NOT NULL,
        comment_type TEXT NOT NULL DEFAULT 'comment',
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_comments_issue ON comments(issue_id, created_at)",
    "CREATE TABLE IF NOT EXISTS shared_plans (
        id           TEXT PRIMARY KEY,
        workspace_id TEXT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
        title        TEXT NOT NULL,
        content      TEXT NOT NULL DEFAULT '',
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_shared_plans_workspace ON shared_plans(workspace_id)",
    "CREATE TABLE IF NOT EXISTS plan_issue_link (
        issue_id   TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        plan_id    TEXT NOT NULL REFERENCES shared_plans(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE (issue_id, plan_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_plan_link_plan ON plan_issue_link(plan_id)",
    "CREATE INDEX IF NOT EXISTS idx_plan_link_issue ON plan_issue_link(issue_id)",
    "CREATE TABLE IF NOT EXISTS events (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        issue_id    TEXT NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
        event_type  TEXT NOT NULL,
        actor       TEXT NOT NULL,
        old_value   TEXT,
        new_value   TEXT,
        comment     TEXT,
        created_at  TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_events_issue ON events(issue_id, created_at)",
    "CREATE TABLE IF NOT EXISTS child_counters (
        parent_id  TEXT PRIMARY KEY REFERENCES issues(id) ON DELETE CASCADE,
        last_child INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
];

/// Named, additive migrations applied after the base schema, tracked via
/// `metadata` keys of the form `migration:<name>`. Empty for now -- there
/// have been no post-v1 schema changes yet.
pub const MIGRATIONS: &[(&str, &str)] = &[];
