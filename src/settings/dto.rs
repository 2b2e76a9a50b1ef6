use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::AppSettings;

#[derive(Debug, Serialize)]
pub struct LoginBranding {
    pub login_name: String,
    pub login_img_url: String,
}

impl From<AppSettings> for LoginBranding {
    fn from(s: AppSettings) -> Self {
        Self {
            login_name: s.login_name,
            login_img_url: s.login_img_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLoginRequest {
    pub login_name: String,
    #[serde(default)]
    pub login_img_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLandingRequest {
    pub landing_enabled: bool,
    #[serde(default)]
    pub landing_dashboard_id: Option<Uuid>,
}
