//! `/workspaces/{ws}/issues/{id}/plan[...]` and `/workspaces/{ws}/plans`
//! (§4.3): inline plan history and standalone shared plans.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use arc_core::comment::Comment;
use arc_core::plan::{NewSharedPlan, PlanContext, SharedPlan, SharedPlanUpdates};

use crate::actor::ActorHeader;
use crate::blocking::run;
use crate::error::ApiResult;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workspaces/{ws}/issues/{id}/plan", get(get_plan_context).post(set_inline_plan))
        .route("/workspaces/{ws}/issues/{id}/plan/history", get(plan_history))
        .route("/workspaces/{ws}/plans", get(list_plans).post(create_plan))
        .route(
            "/workspaces/{ws}/plans/{pid}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/workspaces/{ws}/plans/{pid}/link", axum::routing::post(link_plan))
        .route("/workspaces/{ws}/plans/{pid}/link/{id}", axum::routing::delete(unlink_plan))
}

/// The composite "what plan applies here" view (§4.2's `GetPlanContext`):
/// inline, inherited-from-parent, and linked shared plans, each
/// independently present or absent.
async fn get_plan_context(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
) -> ApiResult<Json<PlanContext>> {
    let service = state.service.clone();
    let ctx = run(move || service.get_plan_context(&ws, &id)).await?;
    Ok(Json(ctx))
}

#[derive(Debug, Deserialize)]
struct PlanTextBody {
    text: String,
}

async fn set_inline_plan(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
    ActorHeader(actor): ActorHeader,
    Json(body): Json<PlanTextBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let service = state.service.clone();
    let comment = run(move || service.set_inline_plan(&ws, &id, &actor, &body.text)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn plan_history(
    State(state): State<SharedState>,
    Path((ws, id)): Path<(String, String)>,
) -> ApiResult<Json<Page<Comment>>> {
    let service = state.service.clone();
    let history = run(move || service.get_plan_history(&ws, &id)).await?;
    Ok(Json(Page::new(history, crate::pagination::DEFAULT_LIMIT, 0)))
}

async fn list_plans(State(state): State<SharedState>, Path(ws): Path<String>) -> ApiResult<Json<Page<SharedPlan>>> {
    let service = state.service.clone();
    let plans = run(move || service.list_plans(&ws)).await?;
    Ok(Json(Page::new(plans, crate::pagination::DEFAULT_LIMIT, 0)))
}

async fn create_plan(
    State(state): State<SharedState>,
    Path(ws): Path<String>,
    Json(body): Json<NewSharedPlan>,
) -> ApiResult<(StatusCode, Json<SharedPlan>)> {
    let service = state.service.clone();
    let plan = run(move || service.create_plan(&ws, body)).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn get_plan(State(state): State<SharedState>, Path((ws, pid)): Path<(String, String)>) -> ApiResult<Json<SharedPlan>> {
    let service = state.service.clone();
    let plan = run(move || service.get_plan(&ws, &pid)).await?;
    Ok(Json(plan))
}

async fn update_plan(
    State(state): State<SharedState>,
    Path((ws, pid)): Path<(String, String)>,
    Json(updates): Json<SharedPlanUpdates>,
) -> ApiResult<Json<SharedPlan>> {
    let service = state.service.clone();
    let plan = run(move || service.update_plan(&ws, &pid, updates)).await?;
    Ok(Json(plan))
}

async fn delete_plan(State(state): State<SharedState>, Path((ws, pid)): Path<(String, String)>) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.delete_plan(&ws, &pid)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct LinkBody {
    issue_id: String,
}

async fn link_plan(
    State(state): State<SharedState>,
    Path((ws, pid)): Path<(String, String)>,
    Json(body): Json<LinkBody>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.link_plan(&ws, &pid, &body.issue_id)).await?;
    Ok(StatusCode::CREATED)
}

async fn unlink_plan(
    State(state): State<SharedState>,
    Path((ws, pid, id)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    run(move || service.unlink_plan(&ws, &pid, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
