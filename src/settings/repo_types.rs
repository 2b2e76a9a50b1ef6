use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Key of the single settings row.
pub const SETTINGS_ID: &str = "DEFAULT";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppSettings {
    pub id: String,
    pub login_name: String,
    pub login_img_url: String,
    pub landing_enabled: bool,
    pub landing_dashboard_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
