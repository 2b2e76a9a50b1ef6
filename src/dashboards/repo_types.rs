use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::access::catalog::{parse_permission_tags, parse_visibility_tags, single_visibility};
use crate::access::{AccessError, DashboardGuard};

/// Dashboard record in the database. Tags are stored as text arrays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dashboard {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub visibility: Vec<String>,
    pub permissions: Vec<String>,
    pub user_id: Option<Uuid>, // owner, PRIVATE only
    pub created_at: OffsetDateTime,
}

impl Dashboard {
    pub fn guard(&self) -> Result<DashboardGuard, AccessError> {
        let visibility = single_visibility(&parse_visibility_tags(&self.visibility)?)?;
        Ok(DashboardGuard {
            visibility,
            permissions: parse_permission_tags(&self.permissions)?,
            owner_user_id: self.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Permission, Visibility};

    #[test]
    fn guard_reads_stored_tags() {
        let owner = Uuid::new_v4();
        let d = Dashboard {
            id: Uuid::new_v4(),
            name: "Ops".into(),
            description: String::new(),
            visibility: vec!["PRIVATE".into()],
            permissions: vec!["READ".into(), "WRITE".into(), "DELETE".into()],
            user_id: Some(owner),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let g = d.guard().unwrap();
        assert_eq!(g.visibility, Visibility::Private);
        assert!(g.permissions.contains(&Permission::Delete));
        assert_eq!(g.owner_user_id, Some(owner));
    }
}
