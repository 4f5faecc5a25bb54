//! `/workspaces/{ws}/ready` and `.../blocked` (§4.3, §4.1): the
//! ready/blocked dependency-aware work queues.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::enums::{IssueType, SortPolicy};
use arc_core::filter::WorkFilter;
use arc_core::issue::Issue;
use arc_storage::BlockedIssue;

use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::{self, Page};
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workspaces/{ws}/ready", get(ready_work))
        .route("/workspaces/{ws}/blocked", get(blocked_work))
}

#[derive(Debug, Deserialize)]
struct ReadyQuery {
    sort: Option<SortPolicy>,
    limit: Option<i32>,
    #[serde(rename = "type")]
    issue_type: Option<IssueType>,
    priority: Option<i32>,
    assignee: Option<String>,
    #[serde(default)]
    unassigned: bool,
}

async fn ready_work(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    Query(q): Query<ReadyQuery>,
) -> ApiResult<Json<Page<Issue>>> {
    let limit = pagination::normalize_limit(q.limit);
    let filter = WorkFilter {
        issue_type: q.issue_type,
        priority: q.priority,
        assignee: q.assignee,
        unassigned: q.unassigned,
        limit: Some(limit),
        sort_policy: q.sort.unwrap_or_default(),
    };

    let service = state.service.clone();
    let issues = run(move || service.ready_work(&ws, &filter)).await?;
    Ok(Json(Page::new(issues, limit, 0)))
}

async fn blocked_work(State(state): State<SharedState>, Path(ws): Path<String>) -> ApiResult<Json<Page<BlockedIssue>>> {
    let service = state.service.clone();
    let blocked = run(move || service.blocked_work(&ws)).await?;
    Ok(Json(Page::new(blocked, pagination::DEFAULT_LIMIT, 0)))
}
