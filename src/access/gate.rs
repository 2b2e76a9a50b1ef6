use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use super::catalog::{Permission, PermissionSet, Visibility};
use super::AccessError;

/// The authenticated user a decision is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardOperation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for DashboardOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DashboardOperation::Create => "create",
            DashboardOperation::Update => "update",
            DashboardOperation::Delete => "delete",
        })
    }
}

/// Admin-only tiers (GLOBAL, LANDING) may only be written by admins;
/// PRIVATE and PUBLIC are open to any authenticated actor.
pub fn authorize_dashboard_write(
    actor: &Actor,
    operation: DashboardOperation,
    visibility: &BTreeSet<Visibility>,
) -> Result<(), AccessError> {
    if visibility.is_empty() {
        return Err(AccessError::MissingVisibility);
    }
    if !actor.is_admin && visibility.iter().any(|v| v.is_admin_only()) {
        tracing::debug!(actor = %actor.id, %operation, "admin-only visibility denied");
        return Err(AccessError::admin_only());
    }
    Ok(())
}

/// Access-relevant view of a stored dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardGuard {
    pub visibility: Visibility,
    pub permissions: PermissionSet,
    pub owner_user_id: Option<Uuid>,
}

impl DashboardGuard {
    fn is_owner(&self, actor: &Actor) -> bool {
        self.owner_user_id == Some(actor.id)
    }

    pub fn can_view(&self, actor: &Actor) -> bool {
        match self.visibility {
            Visibility::Private => self.is_owner(actor),
            Visibility::Public | Visibility::Global => true,
            Visibility::Landing => actor.is_admin,
        }
    }

    pub fn authorize_view(&self, actor: &Actor) -> Result<(), AccessError> {
        if self.can_view(actor) {
            Ok(())
        } else {
            Err(AccessError::NotVisible)
        }
    }

    /// Checks an update or delete of this dashboard. Updates are also gated
    /// on the requested visibility by the caller.
    pub fn authorize_change(
        &self,
        actor: &Actor,
        operation: DashboardOperation,
    ) -> Result<(), AccessError> {
        self.authorize_view(actor)?;
        authorize_dashboard_write(actor, operation, &BTreeSet::from([self.visibility]))?;

        if self.visibility == Visibility::Private && !self.is_owner(actor) {
            return Err(AccessError::AuthorizationDenied(
                "only the owner may change a private dashboard".into(),
            ));
        }

        let needed = match operation {
            DashboardOperation::Create => return Ok(()),
            DashboardOperation::Update => Permission::Write,
            DashboardOperation::Delete => Permission::Delete,
        };
        if self.visibility.rule().is_disabled(needed) {
            return Err(AccessError::OperationNotPermitted(format!(
                "{} dashboards cannot be {}d",
                self.visibility.rule().label.to_lowercase(),
                operation
            )));
        }
        self.require(actor, needed)
    }

    /// Checks the access fields an accepted update would store. A non-admin
    /// editing a shared dashboard can neither take it private nor grant
    /// permissions it does not already carry.
    pub fn authorize_transition(
        &self,
        actor: &Actor,
        visibility: Visibility,
        permissions: &PermissionSet,
    ) -> Result<(), AccessError> {
        if actor.is_admin || self.visibility == Visibility::Private {
            return Ok(());
        }
        if visibility == Visibility::Private {
            return Err(AccessError::AuthorizationDenied(
                "only admins may make a shared dashboard private".into(),
            ));
        }
        match permissions.difference(&self.permissions).next() {
            Some(p) => Err(AccessError::AuthorizationDenied(format!(
                "cannot grant {p} on a dashboard that does not grant it"
            ))),
            None => Ok(()),
        }
    }

    /// Cards are editable by whoever can see the dashboard and holds WRITE.
    pub fn authorize_card_write(&self, actor: &Actor) -> Result<(), AccessError> {
        self.authorize_view(actor)?;
        self.require(actor, Permission::Write)
    }

    fn require(&self, actor: &Actor, permission: Permission) -> Result<(), AccessError> {
        if actor.is_admin || self.permissions.contains(&permission) {
            Ok(())
        } else {
            Err(AccessError::OperationNotPermitted(format!(
                "dashboard does not grant {permission}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            is_admin: false,
        }
    }

    fn admin() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            is_admin: true,
        }
    }

    fn guard(visibility: Visibility, perms: &[Permission], owner: Option<Uuid>) -> DashboardGuard {
        DashboardGuard {
            visibility,
            permissions: perms.iter().copied().collect(),
            owner_user_id: owner,
        }
    }

    const OPS: [DashboardOperation; 3] = [
        DashboardOperation::Create,
        DashboardOperation::Update,
        DashboardOperation::Delete,
    ];

    #[test]
    fn non_admin_denied_admin_only_tiers() {
        for v in [Visibility::Global, Visibility::Landing] {
            for op in OPS {
                let err = authorize_dashboard_write(&user(), op, &BTreeSet::from([v])).unwrap_err();
                assert!(err.to_string().contains("admin-only"));
            }
        }
    }

    #[test]
    fn open_tiers_allowed_for_everyone() {
        for v in [Visibility::Private, Visibility::Public] {
            for actor in [user(), admin()] {
                for op in OPS {
                    assert!(authorize_dashboard_write(&actor, op, &BTreeSet::from([v])).is_ok());
                }
            }
        }
    }

    #[test]
    fn mixed_set_with_admin_tier_is_denied() {
        let set = BTreeSet::from([Visibility::Public, Visibility::Global]);
        assert!(authorize_dashboard_write(&user(), DashboardOperation::Create, &set).is_err());
        assert!(authorize_dashboard_write(&admin(), DashboardOperation::Create, &set).is_ok());
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = authorize_dashboard_write(&admin(), DashboardOperation::Create, &BTreeSet::new());
        assert_eq!(err, Err(AccessError::MissingVisibility));
    }

    #[test]
    fn private_dashboards_are_owner_only() {
        let owner = user();
        let g = guard(Visibility::Private, &Permission::ALL, Some(owner.id));
        assert!(g.can_view(&owner));
        assert!(!g.can_view(&user()));
        assert!(!g.can_view(&admin()));
        assert!(g.authorize_change(&owner, DashboardOperation::Delete).is_ok());
        assert_eq!(
            g.authorize_change(&user(), DashboardOperation::Update),
            Err(AccessError::NotVisible)
        );
    }

    #[test]
    fn landing_is_admin_only_and_never_deletable() {
        let g = guard(Visibility::Landing, &[Permission::Read, Permission::Write], None);
        assert!(!g.can_view(&user()));
        assert!(g.authorize_change(&admin(), DashboardOperation::Update).is_ok());
        assert!(matches!(
            g.authorize_change(&admin(), DashboardOperation::Delete),
            Err(AccessError::OperationNotPermitted(_))
        ));
    }

    #[test]
    fn public_changes_follow_permission_tags() {
        let read_only = guard(Visibility::Public, &[Permission::Read], None);
        assert!(read_only.can_view(&user()));
        assert!(read_only.authorize_change(&user(), DashboardOperation::Update).is_err());
        assert!(read_only.authorize_card_write(&user()).is_err());
        assert!(read_only.authorize_change(&admin(), DashboardOperation::Update).is_ok());

        let writable = guard(Visibility::Public, &[Permission::Read, Permission::Write], None);
        assert!(writable.authorize_card_write(&user()).is_ok());
        assert!(writable.authorize_change(&user(), DashboardOperation::Delete).is_err());
    }

    #[test]
    fn global_is_visible_but_not_changeable_by_users() {
        let g = guard(Visibility::Global, &Permission::ALL, None);
        assert!(g.can_view(&user()));
        let err = g.authorize_change(&user(), DashboardOperation::Update).unwrap_err();
        assert!(matches!(err, AccessError::AuthorizationDenied(_)));
        assert!(g.authorize_card_write(&user()).is_ok());
    }

    #[test]
    fn shared_dashboards_cannot_be_escalated_by_users() {
        let g = guard(Visibility::Public, &[Permission::Read, Permission::Write], None);
        let rw = g.permissions.clone();
        let all: PermissionSet = Permission::ALL.into_iter().collect();

        assert!(g.authorize_transition(&user(), Visibility::Public, &rw).is_ok());
        assert!(g.authorize_transition(&user(), Visibility::Private, &all).is_err());
        assert!(g.authorize_transition(&user(), Visibility::Public, &all).is_err());
        assert!(g.authorize_transition(&admin(), Visibility::Private, &all).is_ok());

        let owner = user();
        let mine = guard(Visibility::Private, &Permission::ALL, Some(owner.id));
        assert!(mine.authorize_transition(&owner, Visibility::Public, &rw).is_ok());
    }
}
