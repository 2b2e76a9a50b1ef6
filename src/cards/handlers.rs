use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CardGroupView, CardResponse, CreateCardRequest, GroupLayout, UpdateCardRequest};
use super::repo;
use super::repo_types::Card;
use super::services::{fields_for_create, fields_for_update, group_cards, layout};
use crate::{
    access::{Actor, DashboardGuard},
    auth::CurrentUser,
    dashboards::services::load_guarded,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboards/:id/cards", get(list_cards))
        .route("/dashboards/:id/cards/layout", get(get_layout))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboards/:id/cards", axum::routing::post(create_card))
        .route("/dashboards/:id/cards/:card_id", put(update_card).delete(delete_card))
}

async fn viewable(state: &AppState, actor: &Actor, dashboard_id: Uuid) -> ApiResult<DashboardGuard> {
    let (_, guard) = load_guarded(&state.db, dashboard_id).await?;
    guard.authorize_view(actor)?;
    Ok(guard)
}

/// Loads a card for writing: the dashboard must grant WRITE and the card
/// must belong to it.
async fn writable_card(
    state: &AppState,
    actor: &Actor,
    dashboard_id: Uuid,
    card_id: Uuid,
) -> ApiResult<Card> {
    let (_, guard) = load_guarded(&state.db, dashboard_id).await?;
    guard.authorize_card_write(actor)?;
    match repo::find(&state.db, card_id).await? {
        Some(card) if card.dashboard_id == dashboard_id => Ok(card),
        _ => Err(ApiError::NotFound("card")),
    }
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<CardGroupView>>> {
    viewable(&state, &actor, id).await?;
    let cards = repo::list_by_dashboard(&state.db, id).await?;
    Ok(Json(group_cards(cards)))
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn get_layout(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<GroupLayout>>> {
    viewable(&state, &actor, id).await?;
    let entries = repo::layout_info(&state.db, id).await?;
    Ok(Json(layout(&entries)))
}

#[instrument(skip(state, actor, payload), fields(user_id = %actor.id))]
pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<CardResponse>)> {
    let (_, guard) = load_guarded(&state.db, id).await?;
    guard.authorize_card_write(&actor)?;

    let entries = repo::layout_info(&state.db, id).await?;
    let fields = fields_for_create(payload, &entries)?;
    let card = repo::create(&state.db, id, &fields).await?;
    info!(dashboard_id = %id, card_id = %card.id, group = %fields.card_group, position = fields.position, "card created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/dashboards/{}/cards/{}", id, card.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(card.into())))
}

#[instrument(skip(state, actor, payload), fields(user_id = %actor.id))]
pub async fn update_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((id, card_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCardRequest>,
) -> ApiResult<Json<CardResponse>> {
    let existing = writable_card(&state, &actor, id, card_id).await?;
    let fields = fields_for_update(&existing, payload)?;
    let card = repo::update(&state.db, card_id, &fields).await?;
    info!(dashboard_id = %id, card_id = %card_id, "card updated");
    Ok(Json(card.into()))
}

#[instrument(skip(state, actor), fields(user_id = %actor.id))]
pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((id, card_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    writable_card(&state, &actor, id, card_id).await?;
    if !repo::delete(&state.db, card_id).await? {
        return Err(ApiError::NotFound("card"));
    }
    info!(dashboard_id = %id, card_id = %card_id, "card deleted");
    Ok(StatusCode::NO_CONTENT)
}
