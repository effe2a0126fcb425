// MediAdmin - app/i18n.rs
//
// Translation lookup. Every user-facing string goes through a `Translator`;
// the rest of the crate treats keys as opaque.
//
// Catalogs are JSON documents, flat or nested; nested keys are joined with
// '.' so `{"EVENTS": {"EVENTS": {"ADD_SERIES": "Add series"}}}` answers the
// key `EVENTS.EVENTS.ADD_SERIES`. Placeholders use the `{{name}}` form.

use crate::util::error::CatalogError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Bundled English catalog used when no catalog file is configured.
const BUNDLED_EN_US: &str = include_str!("../../assets/i18n/en-US.json");

pub trait Translator {
    /// Translate `key`. Unknown keys translate to themselves.
    fn translate(&self, key: &str) -> String;

    /// Translate `key` and substitute `{{name}}` placeholders from `args`.
    fn translate_with(&self, key: &str, args: &[(&str, String)]) -> String {
        interpolate(&self.translate(key), args)
    }
}

/// Substitute `{{name}}` placeholders. Placeholders without a matching
/// argument are left untouched.
pub fn interpolate(template: &str, args: &[(&str, String)]) -> String {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) =
        PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").ok())
    else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        args.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Key → string table loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog shipped inside the binary.
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_EN_US) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "Bundled catalog is invalid; using keys as text");
                Self::empty()
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut entries = HashMap::new();
        flatten("", &value, &mut entries);
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), keys = catalog.len(), "Translation catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full, child, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        // Numbers, booleans, arrays and nulls are not translations.
        _ => {}
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_keys_are_flattened() {
        let catalog =
            Catalog::from_json_str(r#"{"EVENTS": {"EVENTS": {"ADD_SERIES": "Add series"}}, "A": 1}"#)
                .unwrap();
        assert_eq!(catalog.translate("EVENTS.EVENTS.ADD_SERIES"), "Add series");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn unknown_key_translates_to_itself() {
        assert_eq!(Catalog::empty().translate("NOPE.KEY"), "NOPE.KEY");
    }

    #[test]
    fn placeholders_are_interpolated() {
        let catalog = Catalog::from_json_str(r#"{"TABLE_SUMMARY": "{{ numberOfRows }} rows, {{other}}"}"#)
            .unwrap();
        let text = catalog.translate_with("TABLE_SUMMARY", &[("numberOfRows", "12".to_string())]);
        assert_eq!(text, "12 rows, {{other}}");
    }

    #[test]
    fn bundled_catalog_has_navigation_keys() {
        let catalog = Catalog::bundled();
        assert!(!catalog.is_empty());
        assert_ne!(
            catalog.translate("EVENTS.EVENTS.NAVIGATION.SERIES"),
            "EVENTS.EVENTS.NAVIGATION.SERIES"
        );
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Json { .. })));
        assert!(matches!(
            Catalog::load(&dir.path().join("missing.json")),
            Err(CatalogError::Io { .. })
        ));
    }
}
