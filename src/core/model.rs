// MediAdmin - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Resource kind
// =============================================================================

/// The managed collection types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Events,
    Series,
}

impl ResourceKind {
    /// Returns all variants in navigation order.
    pub fn all() -> &'static [ResourceKind] {
        &[ResourceKind::Events, ResourceKind::Series]
    }

    /// Lowercase identifier used in config keys and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Events => "events",
            ResourceKind::Series => "series",
        }
    }

    /// Translation key of the navigation link for this view.
    pub fn nav_key(&self) -> &'static str {
        match self {
            ResourceKind::Events => "EVENTS.EVENTS.NAVIGATION.EVENTS",
            ResourceKind::Series => "EVENTS.EVENTS.NAVIGATION.SERIES",
        }
    }

    /// Translation key of the table caption.
    pub fn caption_key(&self) -> &'static str {
        match self {
            ResourceKind::Events => "EVENTS.EVENTS.TABLE.CAPTION",
            ResourceKind::Series => "EVENTS.SERIES.TABLE.CAPTION",
        }
    }

    /// Translation key of the "add" button.
    pub fn create_key(&self) -> &'static str {
        match self {
            ResourceKind::Events => "EVENTS.EVENTS.ADD_EVENT",
            ResourceKind::Series => "EVENTS.EVENTS.ADD_SERIES",
        }
    }

    /// Translation key of the bulk delete menu entry.
    pub fn delete_key(&self) -> &'static str {
        match self {
            ResourceKind::Events => "BULK_ACTIONS.DELETE.EVENTS.CAPTION",
            ResourceKind::Series => "BULK_ACTIONS.DELETE.SERIES.CAPTION",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "events" | "event" => Ok(ResourceKind::Events),
            "series" => Ok(ResourceKind::Series),
            other => Err(format!(
                "unknown resource kind '{other}', expected 'events' or 'series'"
            )),
        }
    }
}

// =============================================================================
// User profile
// =============================================================================

/// The signed-in user: identifier plus granted role names.
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub roles: HashSet<String>,
}

impl UserProfile {
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

// =============================================================================
// Filters and stats
// =============================================================================

/// One selectable value of a filter, as offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// A named predicate constraining which rows a resource fetch returns.
///
/// An empty `value` means the filter is inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl Filter {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }
}

/// A (filter-name, value) pair a stat stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFilter {
    pub name: String,
    pub value: String,
    /// Display label (translation key) of the filter, if the backend sent one.
    #[serde(default)]
    pub filter: String,
}

/// A precomputed aggregate count tied to one or more filter values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filters: Vec<StatFilter>,
}

// =============================================================================
// Resource rows
// =============================================================================

/// Opaque record of a series or event. Fields are owned by the backend.
pub type ResourceRow = serde_json::Map<String, serde_json::Value>;

/// One page of a resource collection plus the total match count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePage {
    pub rows: Vec<ResourceRow>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_kind_parses_case_insensitively() {
        assert_eq!("Events".parse::<ResourceKind>(), Ok(ResourceKind::Events));
        assert_eq!(" series ".parse::<ResourceKind>(), Ok(ResourceKind::Series));
        assert!("recordings".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn stat_deserialises_without_optional_fields() {
        let stat: Stat = serde_json::from_str(
            r#"{"count": 4, "filters": [{"name": "status", "value": "published"}]}"#,
        )
        .unwrap();
        assert_eq!(stat.count, 4);
        assert_eq!(stat.description, None);
        assert_eq!(stat.filters[0].filter, "");
    }

    #[test]
    fn user_profile_role_lookup() {
        let user = UserProfile::new("admin", ["ROLE_ADMIN", "ROLE_UI_EVENTS_VIEW"]);
        assert!(user.has_role("ROLE_UI_EVENTS_VIEW"));
        assert!(!user.has_role("ROLE_UI_EVENTS_DELETE"));
    }
}
