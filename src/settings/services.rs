use uuid::Uuid;

use super::dto::{UpdateLandingRequest, UpdateLoginRequest};
use super::repo_types::AppSettings;
use crate::access::{DashboardGuard, Visibility};
use crate::error::{ApiError, ApiResult};

/// Trimmed login name and image URL; the name must not be blank.
pub fn login_fields(req: &UpdateLoginRequest) -> ApiResult<(String, String)> {
    let name = req.login_name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Login name is required".into()));
    }
    Ok((name.to_string(), req.login_img_url.trim().to_string()))
}

/// Dashboard id that must be checked before it is stored. Enabling the
/// landing page requires one; a disabled page may keep its selection.
pub fn landing_target(req: &UpdateLandingRequest) -> ApiResult<Option<Uuid>> {
    match (req.landing_enabled, req.landing_dashboard_id) {
        (true, None) => Err(ApiError::Validation(
            "A landing dashboard is required to enable the landing page".into(),
        )),
        (_, id) => Ok(id),
    }
}

/// The referenced dashboard must exist and carry LANDING visibility.
pub fn check_landing_dashboard(guard: Option<&DashboardGuard>) -> ApiResult<()> {
    match guard {
        Some(g) if g.visibility == Visibility::Landing => Ok(()),
        Some(_) => Err(ApiError::Validation(
            "Landing dashboard must have LANDING visibility".into(),
        )),
        None => Err(ApiError::Validation("Landing dashboard does not exist".into())),
    }
}

/// Dashboard to serve on the public landing page, if any.
pub fn landing_dashboard_id(settings: &AppSettings) -> Option<Uuid> {
    settings
        .landing_enabled
        .then_some(settings.landing_dashboard_id)
        .flatten()
}
