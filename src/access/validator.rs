use super::catalog::{parse_permission_tags, PermissionSet, Visibility};
use super::AccessError;

/// Server-side permission normalization. Client values are only a hint: the
/// result always satisfies the catalog row for `visibility`.
pub fn normalize(visibility: Visibility, requested: &PermissionSet) -> PermissionSet {
    visibility.rule().effective_permissions(requested)
}

/// Parses raw tags and normalizes them in one step.
pub fn normalize_tags<S: AsRef<str>>(
    visibility: Visibility,
    requested: &[S],
) -> Result<PermissionSet, AccessError> {
    let parsed = parse_permission_tags(requested)?;
    Ok(normalize(visibility, &parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::catalog::Permission;

    fn all_subsets() -> Vec<PermissionSet> {
        (0u8..8)
            .map(|mask| {
                Permission::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1u8 << *i) != 0)
                    .map(|(_, p)| *p)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn normalize_is_idempotent() {
        for vis in Visibility::ALL {
            for requested in all_subsets() {
                let once = normalize(vis, &requested);
                assert_eq!(normalize(vis, &once), once, "{vis} {requested:?}");
            }
        }
    }

    #[test]
    fn normalized_sets_respect_locked_and_disabled() {
        for vis in Visibility::ALL {
            let rule = vis.rule();
            for requested in all_subsets() {
                let got = normalize(vis, &requested);
                assert!(rule.locked.iter().all(|p| got.contains(p)));
                assert!(rule.disabled.iter().all(|p| !got.contains(p)));
            }
        }
    }

    #[test]
    fn normalize_tags_ignores_client_attempt_to_drop_locked() {
        let got = normalize_tags(Visibility::Private, &["READ"]).unwrap();
        assert_eq!(got.len(), 3);
    }
}
