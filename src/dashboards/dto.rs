use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Dashboard;
use crate::access::{DashboardGuard, Permission, Visibility};
use crate::cards::dto::CardGroupView;

/// Body of create, update and preview requests. Permissions are a hint;
/// the server re-derives them from the visibility tier.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub visibility: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
    pub permissions: Vec<Permission>,
    pub owner_user_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl DashboardResponse {
    pub fn new(d: Dashboard, guard: DashboardGuard) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            visibility: guard.visibility,
            permissions: guard.permissions.into_iter().collect(),
            owner_user_id: guard.owner_user_id,
            created_at: d.created_at,
        }
    }
}

/// Dashboards visible to the caller, split by tier.
#[derive(Debug, Default, Serialize)]
pub struct DashboardListResponse {
    pub private: Vec<DashboardResponse>,
    pub public: Vec<DashboardResponse>,
    pub global: Vec<DashboardResponse>,
    pub landing: Vec<DashboardResponse>,
}

#[derive(Debug, Serialize)]
pub struct DashboardDetails {
    #[serde(flatten)]
    pub dashboard: DashboardResponse,
    pub groups: Vec<CardGroupView>,
}
