/// Rejections produced by the dashboard access rules.
///
/// Every variant is recoverable: handlers turn them into client errors and
/// nothing in this module panics on bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("invalid ownership: {0}")]
    InvalidOwnership(String),

    #[error("unknown visibility tag `{0}`")]
    UnknownVisibilityTag(String),

    #[error("unknown permission tag `{0}`")]
    UnknownPermissionTag(String),

    #[error("at least one visibility tag is required")]
    MissingVisibility,

    #[error("a dashboard has exactly one visibility, got {0}")]
    AmbiguousVisibility(String),

    #[error("operation not permitted: {0}")]
    OperationNotPermitted(String),

    #[error("dashboard not found")]
    NotVisible,
}

impl AccessError {
    pub(crate) fn admin_only() -> Self {
        AccessError::AuthorizationDenied("admin-only visibility requested by non-admin".into())
    }
}
