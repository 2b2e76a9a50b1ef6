use std::collections::BTreeSet;

use uuid::Uuid;

use super::catalog::Visibility;
use super::AccessError;

/// Decides which user a dashboard is attached to.
///
/// Only PRIVATE dashboards have an owner. For every other tier the owner is
/// cleared even when one was supplied, so an update away from PRIVATE
/// disconnects the previous owner.
pub fn resolve_owner(
    visibility: &BTreeSet<Visibility>,
    requested_user_id: Option<Uuid>,
) -> Result<Option<Uuid>, AccessError> {
    if !visibility.contains(&Visibility::Private) {
        return Ok(None);
    }
    match requested_user_id {
        Some(user_id) => Ok(Some(user_id)),
        None => Err(AccessError::InvalidOwnership(
            "private dashboards require an owning user".into(),
        )),
    }
}
