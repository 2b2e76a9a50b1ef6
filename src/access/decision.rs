use serde::ser::{Serialize, SerializeStruct, Serializer};
use uuid::Uuid;

use super::catalog::{parse_visibility_tags, single_visibility, Permission, PermissionSet, Visibility};
use super::gate::{authorize_dashboard_write, Actor, DashboardGuard, DashboardOperation};
use super::ownership::resolve_owner;
use super::validator::normalize_tags;
use super::AccessError;

/// A create or update as submitted by a client, with the actor resolved.
#[derive(Debug, Clone)]
pub struct DashboardWriteRequest {
    pub actor: Actor,
    pub operation: DashboardOperation,
    pub visibility: Vec<String>,
    pub permissions: Vec<String>,
    pub requested_user_id: Option<Uuid>,
}

/// What may be persisted after a request is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDashboard {
    pub visibility: Visibility,
    pub permissions: PermissionSet,
    pub owner_user_id: Option<Uuid>,
}

impl NormalizedDashboard {
    pub fn visibility_tags(&self) -> Vec<String> {
        vec![self.visibility.as_str().to_string()]
    }

    pub fn permission_tags(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.as_str().to_string()).collect()
    }
}

/// Runs the full pipeline: parse, normalize permissions, gate, resolve owner.
pub fn evaluate(request: &DashboardWriteRequest) -> Result<NormalizedDashboard, AccessError> {
    let requested = parse_visibility_tags(&request.visibility)?;
    authorize_dashboard_write(&request.actor, request.operation, &requested)?;
    let visibility = single_visibility(&requested)?;
    let permissions = normalize_tags(visibility, &request.permissions)?;

    let owner_user_id = resolve_owner(&requested, request.requested_user_id)?;
    if let Some(owner) = owner_user_id {
        if owner != request.actor.id && !request.actor.is_admin {
            return Err(AccessError::InvalidOwnership(
                "a private dashboard can only be owned by its creator".into(),
            ));
        }
    }

    Ok(NormalizedDashboard {
        visibility,
        permissions,
        owner_user_id,
    })
}

/// Full update check against the stored dashboard: the current tier must
/// allow the change, the request must pass `evaluate`, and the result must
/// not escalate what the actor could already do.
pub fn evaluate_update(
    current: &DashboardGuard,
    request: &DashboardWriteRequest,
) -> Result<NormalizedDashboard, AccessError> {
    current.authorize_change(&request.actor, DashboardOperation::Update)?;
    let next = evaluate(request)?;
    current.authorize_transition(&request.actor, next.visibility, &next.permissions)?;
    Ok(next)
}

/// Wire form of a decision: accepted with the data to persist, or rejected
/// with a reason. Serialized with an `accepted` flag taken from the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardWriteDecision {
    Accepted {
        visibility: Visibility,
        owner_user_id: Option<Uuid>,
        permissions: Vec<Permission>,
    },
    Rejected {
        reason: String,
    },
}

impl Serialize for DashboardWriteDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DashboardWriteDecision::Accepted {
                visibility,
                owner_user_id,
                permissions,
            } => {
                let mut s = serializer.serialize_struct("DashboardWriteDecision", 4)?;
                s.serialize_field("accepted", &true)?;
                s.serialize_field("visibility", visibility)?;
                s.serialize_field("owner_user_id", owner_user_id)?;
                s.serialize_field("permissions", permissions)?;
                s.end()
            }
            DashboardWriteDecision::Rejected { reason } => {
                let mut s = serializer.serialize_struct("DashboardWriteDecision", 2)?;
                s.serialize_field("accepted", &false)?;
                s.serialize_field("reason", reason)?;
                s.end()
            }
        }
    }
}

impl From<Result<NormalizedDashboard, AccessError>> for DashboardWriteDecision {
    fn from(result: Result<NormalizedDashboard, AccessError>) -> Self {
        match result {
            Ok(n) => DashboardWriteDecision::Accepted {
                visibility: n.visibility,
                owner_user_id: n.owner_user_id,
                permissions: n.permissions.into_iter().collect(),
            },
            Err(e) => DashboardWriteDecision::Rejected {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(is_admin: bool, visibility: &[&str], permissions: &[&str]) -> DashboardWriteRequest {
        DashboardWriteRequest {
            actor: Actor {
                id: Uuid::new_v4(),
                is_admin,
            },
            operation: DashboardOperation::Create,
            visibility: visibility.iter().map(|s| s.to_string()).collect(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            requested_user_id: None,
        }
    }

    #[test]
    fn admin_landing_strips_delete_and_has_no_owner() {
        let mut req = request(true, &["LANDING"], &["READ", "WRITE", "DELETE"]);
        req.requested_user_id = Some(req.actor.id);
        let out = evaluate(&req).unwrap();
        assert_eq!(out.visibility, Visibility::Landing);
        assert_eq!(out.permission_tags(), vec!["READ", "WRITE"]);
        assert_eq!(out.owner_user_id, None);
    }

    #[test]
    fn non_admin_global_is_denied() {
        let err = evaluate(&request(false, &["GLOBAL"], &["READ"])).unwrap_err();
        assert!(matches!(err, AccessError::AuthorizationDenied(_)));
        assert!(err.to_string().contains("admin-only"));
    }

    #[test]
    fn private_gets_full_permissions_and_creator_as_owner() {
        let mut req = request(false, &["PRIVATE"], &[]);
        req.requested_user_id = Some(req.actor.id);
        let out = evaluate(&req).unwrap();
        assert_eq!(out.permissions.len(), 3);
        assert_eq!(out.owner_user_id, Some(req.actor.id));
    }

    #[test]
    fn private_without_owner_is_a_validation_error() {
        let err = evaluate(&request(false, &["PRIVATE"], &["READ"])).unwrap_err();
        assert!(matches!(err, AccessError::InvalidOwnership(_)));
    }

    #[test]
    fn users_cannot_assign_private_dashboards_to_others() {
        let mut req = request(false, &["PRIVATE"], &[]);
        req.requested_user_id = Some(Uuid::new_v4());
        assert!(matches!(evaluate(&req), Err(AccessError::InvalidOwnership(_))));

        req.actor.is_admin = true;
        assert!(evaluate(&req).is_ok());
    }

    #[test]
    fn unknown_visibility_is_rejected_not_defaulted() {
        let err = evaluate(&request(true, &["EVERYONE"], &[])).unwrap_err();
        assert_eq!(err, AccessError::UnknownVisibilityTag("EVERYONE".into()));
    }

    fn shared_read_write() -> DashboardGuard {
        DashboardGuard {
            visibility: Visibility::Public,
            permissions: [Permission::Read, Permission::Write].into_iter().collect(),
            owner_user_id: None,
        }
    }

    fn update(is_admin: bool, visibility: &[&str], permissions: &[&str]) -> DashboardWriteRequest {
        DashboardWriteRequest {
            operation: DashboardOperation::Update,
            ..request(is_admin, visibility, permissions)
        }
    }

    #[test]
    fn updating_a_shared_dashboard_never_unlocks_delete() {
        let current = shared_read_write();

        let mut to_private = update(false, &["PRIVATE"], &[]);
        to_private.requested_user_id = Some(to_private.actor.id);
        let actor = to_private.actor;
        assert!(current.authorize_change(&actor, DashboardOperation::Delete).is_err());
        assert!(matches!(
            evaluate_update(&current, &to_private),
            Err(AccessError::AuthorizationDenied(_))
        ));

        let to_global = update(false, &["GLOBAL"], &["READ", "WRITE"]);
        let err = evaluate_update(&current, &to_global).unwrap_err();
        assert!(err.to_string().contains("admin-only"));

        let grant_delete = update(false, &["PUBLIC"], &["READ", "WRITE", "DELETE"]);
        assert!(evaluate_update(&current, &grant_delete).is_err());

        let rename = update(false, &["PUBLIC"], &["WRITE"]);
        let next = evaluate_update(&current, &rename).unwrap();
        let stored = DashboardGuard {
            visibility: next.visibility,
            permissions: next.permissions,
            owner_user_id: next.owner_user_id,
        };
        assert_eq!(stored, current);
        assert!(stored.authorize_change(&rename.actor, DashboardOperation::Delete).is_err());
    }

    #[test]
    fn admins_may_retier_shared_dashboards() {
        let current = shared_read_write();
        let mut req = update(true, &["PRIVATE"], &[]);
        req.requested_user_id = Some(req.actor.id);
        let next = evaluate_update(&current, &req).unwrap();
        assert_eq!(next.visibility, Visibility::Private);
        assert_eq!(next.owner_user_id, Some(req.actor.id));

        let to_global = update(true, &["GLOBAL"], &["READ", "WRITE", "DELETE"]);
        assert_eq!(evaluate_update(&current, &to_global).unwrap().permissions.len(), 3);
    }

    #[test]
    fn decision_serializes_like_the_record_interface() {
        let accepted: DashboardWriteDecision =
            evaluate(&request(true, &["LANDING"], &["READ", "WRITE", "DELETE"])).into();
        let json = serde_json::to_value(&accepted).unwrap();
        assert_eq!(json["accepted"], true);
        assert!(json["owner_user_id"].is_null());
        assert_eq!(json["permissions"], serde_json::json!(["READ", "WRITE"]));

        let rejected: DashboardWriteDecision = evaluate(&request(false, &["GLOBAL"], &[])).into();
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["accepted"], false);
        assert!(json["reason"].as_str().unwrap().contains("admin-only"));
    }
}
