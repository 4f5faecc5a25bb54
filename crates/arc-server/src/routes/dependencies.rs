//! `/workspaces/{ws}/issues/{id}/deps` (§4.3): dependency edges.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::dependency::{Dependency, DependencyType};

use crate::actor::ActorHeader;
use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workspaces/{ws}/issues/{id}/deps", get(list_deps).post(add_dep))
        .route("/workspaces/{ws}/issues/{id}/deps/{dep}", axum::routing::delete(remove_dep))
}

/// Lists *outgoing* dependencies -- what the issue depends on -- which is
/// the usual sense of "this issue's deps" (incoming edges are exposed via
/// the get-details composite view instead).
async fn list_deps(State(state): State<SharedState>, Path((ws, id)): Path<(String, String)>) -> ApiResult<Json<Page<Dependency>>> {
    let service = state.service.clone();
    let deps = run(move || service.get_outgoing_dependencies(&ws, &id)).await?;
    Ok(Json(Page::new(deps, crate::pagination::DEFAULT_LIMIT, 0)))
}

#[derive(Debug, Deserialize)]
struct AddDepBody {
    depends_on_id: String,
    #[serde(rename = "type", default)]
    dep_type: DependencyType,
}

async fn add_dep(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    Json(body): Json<AddDepBody>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.add_dependency(&ws, &id, &body.depends_on_id, body.dep_type, &actor)).await?;
    Ok(StatusCode::CREATED)
}

async fn remove_dep(
    State(state): State<SharedState>,
    Path((ws, id, dep)): Path<(String, String, String)>,
    ActorHeader(actor): ActorHeader,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.remove_dependency(&ws, &id, &dep, &actor)).await?;
    Ok(StatusCode::NO_CONTENT)
}
