use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{DashboardDetails, DashboardListResponse, DashboardPayload, DashboardResponse};
use super::repo;
use super::services::{load_guarded, text_fields, visible_to, write_request};
use crate::{
    access::{self, catalog, DashboardOperation, DashboardWriteDecision, Visibility},
    auth::CurrentUser,
    cards,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/visibility-catalog", get(get_catalog))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/:id", get(get_dashboard))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboards", post(create_dashboard))
        .route("/dashboards/preview", post(preview_dashboard))
        .route(
            "/dashboards/:id",
            axum::routing::put(update_dashboard).delete(delete_dashboard),
        )
}

pub async fn get_catalog() -> Json<catalog::CatalogView> {
    Json(catalog::catalog_view())
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn list_dashboards(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<DashboardListResponse>> {
    let mut out = DashboardListResponse {
        private: visible_to(&actor, repo::list_private(&state.db, actor.id).await?),
        public: visible_to(&actor, repo::list_shared(&state.db, Visibility::Public).await?),
        global: visible_to(&actor, repo::list_shared(&state.db, Visibility::Global).await?),
        ..Default::default()
    };
    if actor.is_admin {
        out.landing = visible_to(&actor, repo::list_shared(&state.db, Visibility::Landing).await?);
    }
    Ok(Json(out))
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DashboardDetails>> {
    let (dashboard, guard) = load_guarded(&state.db, id).await?;
    guard.authorize_view(&actor)?;
    let cards = cards::repo::list_by_dashboard(&state.db, id).await?;
    Ok(Json(DashboardDetails {
        dashboard: DashboardResponse::new(dashboard, guard),
        groups: cards::services::group_cards(cards),
    }))
}

#[instrument(skip(state, actor, payload), fields(user_id = %actor.id))]
pub async fn create_dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<DashboardPayload>,
) -> ApiResult<(StatusCode, Json<DashboardResponse>)> {
    let (name, description) = text_fields(&payload)?;
    let access = access::evaluate(&write_request(actor, DashboardOperation::Create, &payload))
        .map_err(|e| {
            warn!(error = %e, "dashboard create rejected");
            ApiError::from(e)
        })?;

    let dashboard = repo::create(&state.db, &name, &description, &access).await?;
    info!(dashboard_id = %dashboard.id, visibility = %access.visibility, "dashboard created");
    let guard = dashboard.guard()?;
    Ok((StatusCode::CREATED, Json(DashboardResponse::new(dashboard, guard))))
}

/// Runs the access pipeline without persisting anything.
#[instrument(skip(actor, payload), fields(user_id = %actor.id))]
pub async fn preview_dashboard(
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<DashboardPayload>,
) -> Json<DashboardWriteDecision> {
    let request = write_request(actor, DashboardOperation::Create, &payload);
    Json(access::evaluate(&request).into())
}

#[instrument(skip(state, actor, payload), fields(user_id = %actor.id))]
pub async fn update_dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DashboardPayload>,
) -> ApiResult<Json<DashboardResponse>> {
    let (_, guard) = load_guarded(&state.db, id).await?;
    let request = write_request(actor, DashboardOperation::Update, &payload);
    let access = access::evaluate_update(&guard, &request)
        .map_err(|e| {
            warn!(error = %e, dashboard_id = %id, "dashboard update rejected");
            ApiError::from(e)
        })?;
    let (name, description) = text_fields(&payload)?;

    let dashboard = repo::update(&state.db, id, &name, &description, &access).await?;
    info!(
        dashboard_id = %id,
        from = %guard.visibility,
        to = %access.visibility,
        "dashboard updated"
    );
    let guard = dashboard.guard()?;
    Ok(Json(DashboardResponse::new(dashboard, guard)))
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn delete_dashboard(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (_, guard) = load_guarded(&state.db, id).await?;
    guard.authorize_change(&actor, DashboardOperation::Delete)?;

    let removed_cards = repo::delete_with_cards(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("dashboard"))?;
    info!(dashboard_id = %id, removed_cards, "dashboard deleted");
    Ok(StatusCode::NO_CONTENT)
}
