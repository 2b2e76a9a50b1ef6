use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use super::dto::{DashboardPayload, DashboardResponse};
use super::repo;
use super::repo_types::Dashboard;
use crate::access::{Actor, DashboardGuard, DashboardOperation, DashboardWriteRequest};
use crate::error::{ApiError, ApiResult};

/// Loads a dashboard and its access view; missing rows are 404.
pub async fn load_guarded(db: &PgPool, id: Uuid) -> ApiResult<(Dashboard, DashboardGuard)> {
    let dashboard = repo::find(db, id)
        .await?
        .ok_or(ApiError::NotFound("dashboard"))?;
    let guard = dashboard.guard().map_err(|e| {
        error!(error = %e, dashboard_id = %id, "stored dashboard has invalid access tags");
        ApiError::Internal(anyhow::anyhow!("corrupt access tags on dashboard {id}"))
    })?;
    Ok((dashboard, guard))
}

pub fn write_request(
    actor: Actor,
    operation: DashboardOperation,
    payload: &DashboardPayload,
) -> DashboardWriteRequest {
    DashboardWriteRequest {
        actor,
        operation,
        visibility: payload.visibility.clone(),
        permissions: payload.permissions.clone(),
        requested_user_id: payload.user_id,
    }
}

/// Trimmed name and description; the name is required.
pub fn text_fields(payload: &DashboardPayload) -> ApiResult<(String, String)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Dashboard name is required".into()));
    }
    Ok((name.to_string(), payload.description.trim().to_string()))
}

/// Renders rows the caller may see; rows with unreadable tags are skipped.
pub fn visible_to(actor: &Actor, rows: Vec<Dashboard>) -> Vec<DashboardResponse> {
    rows.into_iter()
        .filter_map(|d| match d.guard() {
            Ok(g) if g.can_view(actor) => Some(DashboardResponse::new(d, g)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, dashboard_id = %d.id, "skipping dashboard with invalid tags");
                None
            }
        })
        .collect()
}
