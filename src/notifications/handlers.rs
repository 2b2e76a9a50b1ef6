use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::CreateNotificationRequest;
use super::repo;
use super::repo_types::Notification;
use crate::{
    auth::{AdminUser, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/notifications", get(list_notifications))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/notifications", post(create_notification))
        .route("/admin/notifications/:id", delete(delete_notification))
}

#[instrument(skip(state, user_id), fields(user_id = %user_id))]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(repo::list(&state.db).await?))
}

#[instrument(skip(state, admin, payload), fields(user_id = %admin.id))]
pub async fn create_notification(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    let (title, message) = payload.validated()?;
    let n = repo::create(&state.db, &title, &message).await?;
    info!(notification_id = %n.id, "notification created");
    Ok((StatusCode::CREATED, Json(n)))
}

#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn delete_notification(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("notification"));
    }
    info!(notification_id = %id, "notification deleted");
    Ok(StatusCode::NO_CONTENT)
}
