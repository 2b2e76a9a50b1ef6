use axum::{extract::State, routing::get, routing::put, Json, Router};
use tracing::{info, instrument, warn};

use super::dto::{LoginBranding, UpdateLandingRequest, UpdateLoginRequest};
use super::repo;
use super::repo_types::AppSettings;
use super::services::{check_landing_dashboard, landing_dashboard_id, landing_target, login_fields};
use crate::{
    access::Visibility,
    auth::AdminUser,
    cards,
    dashboards::{self, dto::DashboardDetails, dto::DashboardResponse},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/settings/login", get(get_login_branding))
        .route("/landing", get(get_landing))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/settings", get(get_settings))
        .route("/admin/settings/login", put(update_login))
        .route("/admin/settings/landing", put(update_landing))
}

pub async fn get_login_branding(State(state): State<AppState>) -> ApiResult<Json<LoginBranding>> {
    let settings = repo::get(&state.db).await?;
    Ok(Json(settings.into()))
}

/// Public landing page: the selected LANDING dashboard with its cards.
#[instrument(skip(state))]
pub async fn get_landing(State(state): State<AppState>) -> ApiResult<Json<DashboardDetails>> {
    let settings = repo::get(&state.db).await?;
    let id = landing_dashboard_id(&settings).ok_or(ApiError::NotFound("landing page"))?;

    let Some(dashboard) = dashboards::repo::find(&state.db, id).await? else {
        return Err(ApiError::NotFound("landing page"));
    };
    let guard = match dashboard.guard() {
        Ok(g) if g.visibility == Visibility::Landing => g,
        _ => {
            warn!(dashboard_id = %id, "landing dashboard is no longer LANDING");
            return Err(ApiError::NotFound("landing page"));
        }
    };
    let cards = cards::repo::list_by_dashboard(&state.db, id).await?;
    Ok(Json(DashboardDetails {
        dashboard: DashboardResponse::new(dashboard, guard),
        groups: cards::services::group_cards(cards),
    }))
}

pub async fn get_settings(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<AppSettings>> {
    Ok(Json(repo::get(&state.db).await?))
}

#[instrument(skip(state, admin, payload), fields(user_id = %admin.id))]
pub async fn update_login(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<UpdateLoginRequest>,
) -> ApiResult<Json<AppSettings>> {
    let (name, img_url) = login_fields(&payload)?;
    let settings = repo::update_login(&state.db, &name, &img_url).await?;
    info!(login_name = %settings.login_name, "login branding updated");
    Ok(Json(settings))
}

#[instrument(skip(state, admin, payload), fields(user_id = %admin.id))]
pub async fn update_landing(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<UpdateLandingRequest>,
) -> ApiResult<Json<AppSettings>> {
    if let Some(id) = landing_target(&payload)? {
        let guard = match dashboards::repo::find(&state.db, id).await? {
            Some(d) => d.guard().ok(),
            None => None,
        };
        check_landing_dashboard(guard.as_ref())?;
    }
    let settings = repo::update_landing(
        &state.db,
        &state.config.settings.login_name,
        payload.landing_enabled,
        payload.landing_dashboard_id,
    )
    .await?;
    info!(
        enabled = settings.landing_enabled,
        dashboard_id = ?settings.landing_dashboard_id,
        "landing page updated"
    );
    Ok(Json(settings))
}
