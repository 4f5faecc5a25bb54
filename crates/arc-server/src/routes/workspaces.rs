//! `/workspaces` (§4.3): workspace CRUD and per-workspace statistics.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use arc_core::workspace::{NewWorkspace, Workspace, WorkspaceUpdates};
use arc_storage::Statistics;

use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/{ws}",
            get(get_workspace).put(update_workspace).delete(delete_workspace),
        )
        .route("/workspaces/{ws}/stats", get(workspace_stats))
}

async fn list_workspaces(State(state): State<SharedState>) -> ApiResult<Json<Page<Workspace>>> {
    let service = state.service.clone();
    let workspaces = run(move || service.list_workspaces()).await?;
    Ok(Json(Page::new(workspaces, crate::pagination::DEFAULT_LIMIT, 0)))
}

async fn create_workspace(
    State(state): State<SharedState>,
    Json(body): Json<NewWorkspace>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let service = state.service.clone();
    let workspace = run(move || service.create_workspace(body)).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

async fn get_workspace(State(state): State<SharedState>, Path(ws): Path<String>) -> ApiResult<Json<Workspace>> {
    let service = state.service.clone();
    let workspace = run(move || service.get_workspace(&ws)).await?;
    Ok(Json(workspace))
}

async fn update_workspace(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    Json(updates): Json<WorkspaceUpdates>,
) -> ApiResult<Json<Workspace>> {
    let service = state.service.clone();
    let workspace = run(move || service.update_workspace(&ws, updates)).await?;
    Ok(Json(workspace))
}

async fn delete_workspace(State(state): State<SharedState>, Path(ws): Path<String>) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.delete_workspace(&ws)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn workspace_stats(State(state): State<SharedState>, Path(ws): Path<String>) -> ApiResult<Json<Statistics>> {
    let service = state.service.clone();
    let stats = run(move || service.workspace_statistics(&ws)).await?;
    Ok(Json(stats))
}
