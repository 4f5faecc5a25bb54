//! `/labels` (global vocabulary) and `/workspaces/{ws}/issues/{id}/labels`
//! (per-issue association) (§4.3).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::comment::{Label, LabelUpdates};

use crate::actor::ActorHeader;
use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/labels", get(list_labels).post(create_label))
        .route("/labels/{name}", get(get_label).put(update_label).delete(delete_label))
        .route(
            "/workspaces/{ws}/issues/{id}/labels",
            get(list_issue_labels).post(add_issue_label),
        )
        .route(
            "/workspaces/{ws}/issues/{id}/labels/{label}",
            axum::routing::delete(remove_issue_label),
        )
}

async fn list_labels(State(state): State<SharedState>) -> ApiResult<Json<Page<Label>>> {
    let service = state.service.clone();
    let labels = run(move || service.list_labels()).await?;
    Ok(Json(Page::new(labels, crate::pagination::DEFAULT_LIMIT, 0)))
}

async fn create_label(State(state): State<SharedState>, Json(label): Json<Label>) -> ApiResult<(StatusCode, Json<Label>)> {
    let service = state.service.clone();
    let label = run(move || service.create_label(label)).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

async fn get_label(State(state): State<SharedState>, Path(name): Path<String>) -> ApiResult<Json<Label>> {
    let service = state.service.clone();
    let label = run(move || service.get_label(&name)).await?;
    Ok(Json(label))
}

async fn update_label(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Json(updates): Json<LabelUpdates>,
) -> ApiResult<Json<Label>> {
    let service = state.service.clone();
    let label = run(move || service.update_label(&name, updates)).await?;
    Ok(Json(label))
}

async fn delete_label(State(state): State<SharedState>, Path(name): Path<String>) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.delete_label(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_issue_labels(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
) -> ApiResult<Json<Page<String>>> {
    let service = state.service.clone();
    let labels = run(move || service.get_issue_labels(&ws, &id)).await?;
    Ok(Json(Page::new(labels, crate::pagination::DEFAULT_LIMIT, 0)))
}

#[derive(Debug, Deserialize)]
struct AddIssueLabelBody {
    name: String,
}

async fn add_issue_label(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    Json(body): Json<AddIssueLabelBody>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.add_label_to_issue(&ws, &id, &body.name, &actor)).await?;
    Ok(StatusCode::CREATED)
}

async fn remove_issue_label(
    State(state): State<SharedState>,
    Path((ws, id, label)): Path<(String, String, String)>,
    ActorHeader(actor): ActorHeader,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.remove_label_from_issue(&ws, &id, &label, &actor)).await?;
    Ok(StatusCode::NO_CONTENT)
}
