use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AccessError;

/// Bumped whenever a tier's locked or disabled permissions change.
pub const CATALOG_VERSION: u32 = 1;

/// Who can see a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Private,
    Public,
    Global,
    Landing,
}

/// What a non-admin may do with a dashboard they can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

pub type PermissionSet = BTreeSet<Permission>;

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::Private,
        Visibility::Public,
        Visibility::Global,
        Visibility::Landing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::Public => "PUBLIC",
            Visibility::Global => "GLOBAL",
            Visibility::Landing => "LANDING",
        }
    }

    /// GLOBAL and LANDING dashboards are managed by admins only.
    pub fn is_admin_only(self) -> bool {
        matches!(self, Visibility::Global | Visibility::Landing)
    }

    pub fn rule(self) -> &'static VisibilityRule {
        match self {
            Visibility::Private => &CATALOG[0],
            Visibility::Public => &CATALOG[1],
            Visibility::Global => &CATALOG[2],
            Visibility::Landing => &CATALOG[3],
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRIVATE" => Ok(Visibility::Private),
            "PUBLIC" => Ok(Visibility::Public),
            "GLOBAL" => Ok(Visibility::Global),
            "LANDING" => Ok(Visibility::Landing),
            _ => Err(AccessError::UnknownVisibilityTag(s.trim().to_string())),
        }
    }
}

impl Permission {
    pub const ALL: [Permission; 3] = [Permission::Read, Permission::Write, Permission::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Read => "READ",
            Permission::Write => "WRITE",
            Permission::Delete => "DELETE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Permission::Read => "View dashboard content and data",
            Permission::Write => "Create and modify dashboard items",
            Permission::Delete => "Remove dashboards and their content",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "READ" => Ok(Permission::Read),
            "WRITE" => Ok(Permission::Write),
            "DELETE" => Ok(Permission::Delete),
            _ => Err(AccessError::UnknownPermissionTag(s.trim().to_string())),
        }
    }
}

/// How a single permission behaves under a visibility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Locked,
    Disabled,
    Toggleable,
}

#[derive(Debug)]
pub struct VisibilityRule {
    pub visibility: Visibility,
    pub label: &'static str,
    pub locked: &'static [Permission],
    pub disabled: &'static [Permission],
}

static CATALOG: [VisibilityRule; 4] = [
    VisibilityRule {
        visibility: Visibility::Private,
        label: "Private",
        locked: &[Permission::Read, Permission::Write, Permission::Delete],
        disabled: &[],
    },
    VisibilityRule {
        visibility: Visibility::Public,
        label: "Public",
        locked: &[Permission::Read],
        disabled: &[],
    },
    VisibilityRule {
        visibility: Visibility::Global,
        label: "Global",
        locked: &[Permission::Read],
        disabled: &[],
    },
    VisibilityRule {
        visibility: Visibility::Landing,
        label: "Landing",
        locked: &[Permission::Read],
        disabled: &[Permission::Delete],
    },
];

impl VisibilityRule {
    pub fn state_of(&self, permission: Permission) -> PermissionState {
        if self.locked.contains(&permission) {
            PermissionState::Locked
        } else if self.disabled.contains(&permission) {
            PermissionState::Disabled
        } else {
            PermissionState::Toggleable
        }
    }

    pub fn is_disabled(&self, permission: Permission) -> bool {
        self.disabled.contains(&permission)
    }

    /// Requested permissions with locked ones forced on and disabled ones
    /// forced off.
    pub fn effective_permissions(&self, requested: &PermissionSet) -> PermissionSet {
        requested
            .iter()
            .chain(self.locked.iter())
            .copied()
            .filter(|p| !self.disabled.contains(p))
            .collect()
    }
}

pub fn effective_permissions(visibility: Visibility, requested: &PermissionSet) -> PermissionSet {
    visibility.rule().effective_permissions(requested)
}

/// Parses client-submitted visibility tags. Blank entries are ignored;
/// anything outside the four known tags is rejected.
pub fn parse_visibility_tags<S: AsRef<str>>(
    tags: &[S],
) -> Result<BTreeSet<Visibility>, AccessError> {
    let set = tags
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<Visibility>)
        .collect::<Result<BTreeSet<_>, _>>()?;
    if set.is_empty() {
        return Err(AccessError::MissingVisibility);
    }
    Ok(set)
}

/// Parses client-submitted permission tags. Entries may themselves be
/// comma-separated ("READ,WRITE").
pub fn parse_permission_tags<S: AsRef<str>>(tags: &[S]) -> Result<PermissionSet, AccessError> {
    tags.iter()
        .flat_map(|t| t.as_ref().split(','))
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<Permission>)
        .collect()
}

/// Collapses a tag set to the one visibility a dashboard carries.
pub fn single_visibility(set: &BTreeSet<Visibility>) -> Result<Visibility, AccessError> {
    let mut iter = set.iter();
    match (iter.next(), iter.next()) {
        (Some(v), None) => Ok(*v),
        (None, _) => Err(AccessError::MissingVisibility),
        (Some(_), Some(_)) => Err(AccessError::AmbiguousVisibility(
            set.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct PermissionInfo {
    pub permission: Permission,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub visibility: Visibility,
    pub label: &'static str,
    pub admin_only: bool,
    pub default_permissions: Vec<Permission>,
    pub permissions: Vec<(Permission, PermissionState)>,
}

/// Read-only rendering of the catalog served to clients.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub version: u32,
    pub permissions: Vec<PermissionInfo>,
    pub tiers: Vec<TierInfo>,
}

pub fn catalog_view() -> CatalogView {
    CatalogView {
        version: CATALOG_VERSION,
        permissions: Permission::ALL
            .iter()
            .map(|p| PermissionInfo {
                permission: *p,
                description: p.description(),
            })
            .collect(),
        tiers: CATALOG
            .iter()
            .map(|rule| TierInfo {
                visibility: rule.visibility,
                label: rule.label,
                admin_only: rule.visibility.is_admin_only(),
                default_permissions: rule.locked.to_vec(),
                permissions: Permission::ALL
                    .iter()
                    .map(|p| (*p, rule.state_of(*p)))
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(perms: &[Permission]) -> PermissionSet {
        perms.iter().copied().collect()
    }

    #[test]
    fn private_locks_everything_on() {
        let got = effective_permissions(Visibility::Private, &PermissionSet::new());
        assert_eq!(got, set(&Permission::ALL));
    }

    #[test]
    fn landing_strips_delete() {
        let got = effective_permissions(Visibility::Landing, &set(&Permission::ALL));
        assert_eq!(got, set(&[Permission::Read, Permission::Write]));
    }

    #[test]
    fn public_and_global_force_read_and_keep_toggles() {
        for vis in [Visibility::Public, Visibility::Global] {
            let got = effective_permissions(vis, &set(&[Permission::Delete]));
            assert_eq!(got, set(&[Permission::Read, Permission::Delete]));
        }
    }

    #[test]
    fn catalog_rows_match_their_tags() {
        for vis in Visibility::ALL {
            assert_eq!(vis.rule().visibility, vis);
        }
    }

    #[test]
    fn locked_and_disabled_never_overlap() {
        for vis in Visibility::ALL {
            let rule = vis.rule();
            assert!(rule.locked.iter().all(|p| !rule.disabled.contains(p)));
        }
    }

    #[test]
    fn parses_tags_case_insensitively_and_skips_blanks() {
        let vis = parse_visibility_tags(&["", " public "]).unwrap();
        assert_eq!(vis.into_iter().collect::<Vec<_>>(), vec![Visibility::Public]);

        let perms = parse_permission_tags(&["read,WRITE", ""]).unwrap();
        assert_eq!(perms, set(&[Permission::Read, Permission::Write]));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(
            parse_visibility_tags(&["SECRET"]).unwrap_err(),
            AccessError::UnknownVisibilityTag("SECRET".into())
        );
        assert_eq!(
            parse_permission_tags(&["READ", "ADMIN"]).unwrap_err(),
            AccessError::UnknownPermissionTag("ADMIN".into())
        );
    }

    #[test]
    fn empty_visibility_is_missing() {
        let empty: [&str; 0] = [];
        assert_eq!(
            parse_visibility_tags(&empty).unwrap_err(),
            AccessError::MissingVisibility
        );
    }

    #[test]
    fn single_visibility_requires_exactly_one_tag() {
        let one = parse_visibility_tags(&["GLOBAL", "global"]).unwrap();
        assert_eq!(single_visibility(&one).unwrap(), Visibility::Global);

        let two = parse_visibility_tags(&["PUBLIC", "PRIVATE"]).unwrap();
        assert!(matches!(
            single_visibility(&two),
            Err(AccessError::AmbiguousVisibility(_))
        ));
    }

    #[test]
    fn catalog_view_serializes_uppercase_tags() {
        let json = serde_json::to_value(catalog_view()).unwrap();
        assert_eq!(json["version"], CATALOG_VERSION);
        assert_eq!(json["tiers"][3]["visibility"], "LANDING");
        assert_eq!(json["tiers"][3]["permissions"][2][1], "disabled");
        assert_eq!(json["tiers"][0]["default_permissions"].as_array().unwrap().len(), 3);
    }
}
