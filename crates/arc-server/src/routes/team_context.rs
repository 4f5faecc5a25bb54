//! `/workspaces/{ws}/team-context` (§4.3): issues grouped by
//! `teammate:<role>` label, optionally scoped to an epic's direct children.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::team_context::TeamContextView;

use crate::blocking::run;
use crate::error::ApiResult;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new().route("/workspaces/{ws}/team-context", get(team_context))
}

#[derive(Debug, Deserialize)]
struct TeamContextQuery {
    epic_id: Option<String>,
}

async fn team_context(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    Query(q): Query<TeamContextQuery>,
) -> ApiResult<Json<TeamContextView>> {
    let service = state.service.clone();
    let view = run(move || service.get_team_context(&ws, q.epic_id.as_deref())).await?;
    Ok(Json(view))
}
