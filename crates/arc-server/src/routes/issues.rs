//! `/workspaces/{ws}/issues` (§4.3): issue CRUD, the get-details composite
//! view, close/reopen.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::enums::{IssueType, Status};
use arc_core::filter::IssueFilter;
use arc_core::issue::{Issue, IssueDetails, IssueUpdates, NewIssue};

use crate::actor::ActorHeader;
use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::{self, Page};
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workspaces/{ws}/issues", get(list_issues).post(create_issue))
        .route(
            "/workspaces/{ws}/issues/{id}",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
        .route("/workspaces/{ws}/issues/{id}/close", post(close_issue))
        .route("/workspaces/{ws}/issues/{id}/reopen", post(reopen_issue))
}

#[derive(Debug, Deserialize)]
struct ListIssuesQuery {
    status: Option<Status>,
    #[serde(rename = "type")]
    issue_type: Option<IssueType>,
    priority: Option<i32>,
    assignee: Option<String>,
    query: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
}

async fn list_issues(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    Query(q): Query<ListIssuesQuery>,
) -> ApiResult<Json<Page<Issue>>> {
    let limit = pagination::normalize_limit(q.limit);
    let offset = pagination::normalize_offset(q.offset);
    let filter = IssueFilter {
        status: q.status,
        issue_type: q.issue_type,
        priority: q.priority,
        assignee: q.assignee,
        query: q.query,
        limit: Some(limit),
        offset: Some(offset),
    };

    let service = state.service.clone();
    let issues = run(move || service.search_issues(&ws, &filter)).await?;
    Ok(Json(Page::new(issues, limit, offset)))
}

async fn create_issue(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    ActorHeader(actor): ActorHeader,
    Json(body): Json<NewIssue>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let service = state.service.clone();
    let issue = run(move || service.create_issue(&ws, body, &actor)).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn get_issue(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
) -> ApiResult<Json<IssueDetails>> {
    let service = state.service.clone();
    let details = run(move || service.get_issue_details(&ws, &id)).await?;
    Ok(Json(details))
}

async fn update_issue(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    Json(updates): Json<IssueUpdates>,
) -> ApiResult<Json<Issue>> {
    let service = state.service.clone();
    let issue = run(move || service.update_issue(&ws, &id, updates, &actor)).await?;
    Ok(Json(issue))
}

async fn delete_issue(State(state): State<SharedState>, Path((ws, id)): Path<(String, String)>) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.delete_issue(&ws, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
struct CloseBody {
    #[serde(default)]
    reason: String,
}

async fn close_issue(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    body: Option<Json<CloseBody>>,
) -> ApiResult<Json<Issue>> {
    let reason = body.map(|Json(b)| b.reason).unwrap_or_default();
    let service = state.service.clone();
    let issue = run(move || service.close_issue(&ws, &id, &reason, &actor)).await?;
    Ok(Json(issue))
}

async fn reopen_issue(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
) -> ApiResult<Json<Issue>> {
    let service = state.service.clone();
    let issue = run(move || service.reopen_issue(&ws, &id, &actor)).await?;
    Ok(Json(issue))
}
