//! `/workspaces/{ws}/issues/{id}/comments` and `.../events` (§4.3).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::comment::{Comment, Event};

use crate::actor::ActorHeader;
use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/workspaces/{ws}/issues/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/workspaces/{ws}/issues/{id}/comments/{cid}",
            axum::routing::put(update_comment).delete(delete_comment),
        )
        .route("/workspaces/{ws}/issues/{id}/events", get(list_events))
}

async fn list_comments(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
) -> ApiResult<Json<Page<Comment>>> {
    let service = state.service.clone();
    let comments = run(move || service.get_comments(&ws, &id)).await?;
    Ok(Json(Page::new(comments, crate::pagination::DEFAULT_LIMIT, 0)))
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    text: String,
}

async fn add_comment(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    Json(body): Json<CommentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let service = state.service.clone();
    let comment = run(move || service.add_comment(&ws, &id, &actor, &body.text)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update_comment(
    State(state): State<SharedState>,
    Path((ws, id, cid)): Path<(String, String, i64)>,
    Json(body): Json<CommentBody>,
) -> ApiResult<Json<Comment>> {
    let service = state.service.clone();
    let comment = run(move || service.update_comment(&ws, &id, cid, &body.text)).await?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<SharedState>,
    Path((ws, id, cid)): Path<(String, String, i64)>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.delete_comment(&ws, &id, cid)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    limit: Option<i64>,
}

async fn list_events(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    Query(q): Query<EventsQuery>,
) -> ApiResult<Json<Page<Event>>> {
    let limit = q.limit;
    let service = state.service.clone();
    let events = run(move || service.get_events(&ws, &id, limit)).await?;
    let limit32 = crate::pagination::normalize_limit(limit.map(|l| l as i32));
    Ok(Json(Page::new(events, limit32, 0)))
}
