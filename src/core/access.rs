// MediAdmin - core/access.rs
//
// Role-based access checks. Pure functions over the user profile.

use crate::core::model::{ResourceKind, UserProfile};
use crate::util::constants;
use crate::util::error::AdminError;

/// Returns true iff `permission` is one of the user's granted roles.
/// An absent user has no permissions.
pub fn has_access(permission: &str, user: Option<&UserProfile>) -> bool {
    user.is_some_and(|u| u.has_role(permission))
}

/// Data-layer variant of [`has_access`] for privileged operations.
pub fn ensure_access(permission: &str, user: Option<&UserProfile>) -> Result<(), AdminError> {
    if has_access(permission, user) {
        Ok(())
    } else {
        tracing::warn!(
            permission,
            user = user.map(|u| u.username.as_str()).unwrap_or("<none>"),
            "Privileged operation refused"
        );
        Err(AdminError::AccessDenied {
            permission: permission.to_string(),
        })
    }
}

/// Privileged capabilities a list view exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    View,
    Create,
    Delete,
}

/// Permission names guarding one resource kind. Names are deployment
/// configuration and may be overridden in config.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePermissions {
    pub view: String,
    pub create: String,
    pub delete: String,
}

impl ResourcePermissions {
    /// Built-in permission names for `kind`.
    pub fn defaults_for(kind: ResourceKind) -> Self {
        let (view, create, delete) = match kind {
            ResourceKind::Events => (
                constants::ROLE_EVENTS_VIEW,
                constants::ROLE_EVENTS_CREATE,
                constants::ROLE_EVENTS_DELETE,
            ),
            ResourceKind::Series => (
                constants::ROLE_SERIES_VIEW,
                constants::ROLE_SERIES_CREATE,
                constants::ROLE_SERIES_DELETE,
            ),
        };
        Self {
            view: view.to_string(),
            create: create.to_string(),
            delete: delete.to_string(),
        }
    }

    pub fn name_for(&self, capability: Capability) -> &str {
        match capability {
            Capability::View => &self.view,
            Capability::Create => &self.create,
            Capability::Delete => &self.delete,
        }
    }

    pub fn allows(&self, capability: Capability, user: Option<&UserProfile>) -> bool {
        has_access(self.name_for(capability), user)
    }
}

/// Permission names for every resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTable {
    pub events: ResourcePermissions,
    pub series: ResourcePermissions,
}

impl PermissionTable {
    pub fn for_kind(&self, kind: ResourceKind) -> &ResourcePermissions {
        match kind {
            ResourceKind::Events => &self.events,
            ResourceKind::Series => &self.series,
        }
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self {
            events: ResourcePermissions::defaults_for(ResourceKind::Events),
            series: ResourcePermissions::defaults_for(ResourceKind::Series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_role_gives_access() {
        let user = UserProfile::new("admin", ["ROLE_UI_SERIES_CREATE"]);
        assert!(has_access("ROLE_UI_SERIES_CREATE", Some(&user)));
        assert!(!has_access("ROLE_UI_SERIES_DELETE", Some(&user)));
    }

    #[test]
    fn absent_user_has_no_access() {
        assert!(!has_access("ROLE_UI_SERIES_CREATE", None));
        assert!(ensure_access("ROLE_UI_SERIES_CREATE", None).is_err());
    }

    #[test]
    fn permission_lookup_by_capability() {
        let perms = PermissionTable::default();
        assert_eq!(
            perms.for_kind(ResourceKind::Series).name_for(Capability::Delete),
            "ROLE_UI_SERIES_DELETE"
        );
        let user = UserProfile::new("u", ["ROLE_UI_EVENTS_VIEW"]);
        assert!(perms.events.allows(Capability::View, Some(&user)));
        assert!(!perms.series.allows(Capability::View, Some(&user)));
    }

    #[test]
    fn ensure_access_reports_missing_permission() {
        let user = UserProfile::new("u", Vec::<String>::new());
        match ensure_access("ROLE_UI_EVENTS_DELETE", Some(&user)) {
            Err(AdminError::AccessDenied { permission }) => {
                assert_eq!(permission, "ROLE_UI_EVENTS_DELETE")
            }
            other => panic!("expected AccessDenied, got {other:?}"),
        }
    }
}
