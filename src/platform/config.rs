// MediAdmin - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::app::http::{Endpoints, HttpSettings};
use crate::core::access::{PermissionTable, ResourcePermissions};
use crate::core::model::ResourceKind;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for MediAdmin configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/mediadmin/ or %APPDATA%\MediAdmin\config\)
    pub config_dir: PathBuf,

    /// Data directory for logs and other runtime files.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Location of config.toml inside the config directory.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// Raw config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so newer config files still load.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub backend: BackendSection,
    pub endpoints: EndpointsSection,
    pub refresh: RefreshSection,
    pub table: TableSection,
    pub permissions: PermissionsSection,
    pub i18n: I18nSection,
    pub logging: LoggingSection,
}

/// `[backend]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BackendSection {
    /// Base URL of the admin REST API.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password. Never logged.
    pub password: Option<String>,
}

/// `[endpoints]` config section. Paths are relative to the base URL.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EndpointsSection {
    pub events_list: Option<String>,
    pub series_list: Option<String>,
    /// Empty string disables stats for the kind.
    pub events_stats: Option<String>,
    pub series_stats: Option<String>,
    pub events_filters: Option<String>,
    pub series_filters: Option<String>,
    /// Must contain the `{id}` placeholder.
    pub events_delete: Option<String>,
    pub series_delete: Option<String>,
    pub user_info: Option<String>,
}

/// `[refresh]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    pub interval_secs: Option<u64>,
}

/// `[table]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TableSection {
    pub page_size: Option<u64>,
}

/// `[permissions.events]` / `[permissions.series]` config sections.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PermissionsSection {
    pub events: PermissionNames,
    pub series: PermissionNames,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PermissionNames {
    pub view: Option<String>,
    pub create: Option<String>,
    pub delete: Option<String>,
}

/// `[i18n]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct I18nSection {
    /// Path of a JSON translation catalog. Unset = bundled en-US.
    pub catalog: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Backend --
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: Option<(String, String)>,
    pub endpoints: Endpoints,

    // -- List views --
    pub refresh_interval: Duration,
    pub page_size: u64,
    pub permissions: PermissionTable,

    // -- i18n --
    pub catalog_path: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            credentials: None,
            endpoints: Endpoints::default(),
            refresh_interval: Duration::from_secs(constants::DEFAULT_REFRESH_INTERVAL_SECS),
            page_size: constants::DEFAULT_PAGE_SIZE,
            permissions: PermissionTable::default(),
            catalog_path: None,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Connection settings for the HTTP backend.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            credentials: self.credentials.clone(),
            endpoints: self.endpoints.clone(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    load_config_file(&config_dir.join(constants::CONFIG_FILE_NAME))
}

/// Load and validate a config file at an explicit path (`--config`).
///
/// An unreadable or unparseable file yields defaults plus one warning; the
/// application still starts but the user is informed.
pub fn load_config_file(path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults. See config.example.toml for the expected format.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }
    (config, warnings)
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Check `value` against `range`, describing the violation as a
/// `ConfigError::ValueOutOfRange`.
fn check_range(
    field: &str,
    value: u64,
    range: RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            expected: format!("{}-{}", range.start(), range.end()),
        })
    }
}

/// Validate each field of `raw`, accumulating all problems in `warnings`.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Backend: base_url --
    if let Some(url) = raw.backend.base_url {
        match reqwest::Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                config.base_url = url;
            }
            _ => warnings.push(format!(
                "[backend] base_url = \"{url}\" is not an http(s) URL. Using default ({}).",
                constants::DEFAULT_BASE_URL,
            )),
        }
    }

    // -- Backend: timeout_secs --
    if let Some(secs) = raw.backend.timeout_secs {
        match check_range(
            "[backend] timeout_secs",
            secs,
            constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS,
        ) {
            Ok(secs) => config.timeout = Duration::from_secs(secs),
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_REQUEST_TIMEOUT_SECS
            )),
        }
    }

    // -- Backend: credentials --
    match (raw.backend.username, raw.backend.password) {
        (Some(user), password) if !user.is_empty() => {
            config.credentials = Some((user, password.unwrap_or_default()));
        }
        (_, Some(_)) => warnings.push(
            "[backend] password is set without a username. Requests are sent unauthenticated."
                .to_string(),
        ),
        _ => {}
    }

    // -- Endpoints --
    validate_endpoints(raw.endpoints, &mut config.endpoints, warnings);

    // -- Refresh: interval_secs --
    if let Some(secs) = raw.refresh.interval_secs {
        match check_range(
            "[refresh] interval_secs",
            secs,
            constants::MIN_REFRESH_INTERVAL_SECS..=constants::MAX_REFRESH_INTERVAL_SECS,
        ) {
            Ok(secs) => config.refresh_interval = Duration::from_secs(secs),
            Err(e) => warnings.push(format!(
                "{e}. Using default ({}).",
                constants::DEFAULT_REFRESH_INTERVAL_SECS
            )),
        }
    }

    // -- Table: page_size --
    if let Some(size) = raw.table.page_size {
        match check_range(
            "[table] page_size",
            size,
            constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE,
        ) {
            Ok(size) => config.page_size = size,
            Err(e) => warnings.push(format!("{e}. Using default ({}).", constants::DEFAULT_PAGE_SIZE)),
        }
    }

    // -- Permissions --
    config.permissions = PermissionTable {
        events: permissions_for(ResourceKind::Events, raw.permissions.events, warnings),
        series: permissions_for(ResourceKind::Series, raw.permissions.series, warnings),
    };

    // -- i18n: catalog --
    if let Some(catalog) = raw.i18n.catalog.filter(|c| !c.is_empty()) {
        config.catalog_path = Some(PathBuf::from(catalog));
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(file);
    }

    config
}

fn validate_endpoints(raw: EndpointsSection, endpoints: &mut Endpoints, warnings: &mut Vec<String>) {
    let mut set_path = |key: &str, value: Option<String>, target: &mut String| {
        match value {
            Some(v) if v.trim().is_empty() => {
                warnings.push(format!("[endpoints] {key} is empty. Using default ({target})."));
            }
            Some(v) => *target = v,
            None => {}
        }
    };
    set_path("events_list", raw.events_list, &mut endpoints.events_list);
    set_path("series_list", raw.series_list, &mut endpoints.series_list);
    set_path("events_filters", raw.events_filters, &mut endpoints.events_filters);
    set_path("series_filters", raw.series_filters, &mut endpoints.series_filters);
    set_path("user_info", raw.user_info, &mut endpoints.user_info);

    // Stats: an empty path turns stats off for the kind.
    if let Some(path) = raw.events_stats {
        endpoints.events_stats = Some(path).filter(|p| !p.trim().is_empty());
    }
    if let Some(path) = raw.series_stats {
        endpoints.series_stats = Some(path).filter(|p| !p.trim().is_empty());
    }

    for (key, value, target) in [
        ("events_delete", raw.events_delete, &mut endpoints.events_delete),
        ("series_delete", raw.series_delete, &mut endpoints.series_delete),
    ] {
        match value {
            Some(v) if v.contains(constants::ID_PLACEHOLDER) => *target = v,
            Some(v) => warnings.push(format!(
                "[endpoints] {key} = \"{v}\" has no {} placeholder. Using default ({target}).",
                constants::ID_PLACEHOLDER,
            )),
            None => {}
        }
    }
}

fn permissions_for(
    kind: ResourceKind,
    raw: PermissionNames,
    warnings: &mut Vec<String>,
) -> ResourcePermissions {
    let mut perms = ResourcePermissions::defaults_for(kind);
    for (key, value, target) in [
        ("view", raw.view, &mut perms.view),
        ("create", raw.create, &mut perms.create),
        ("delete", raw.delete, &mut perms.delete),
    ] {
        match value {
            Some(v) if v.trim().is_empty() => warnings.push(format!(
                "[permissions.{kind}] {key} is empty. Using default ({target})."
            )),
            Some(v) => *target = v,
            None => {}
        }
    }
    perms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults_without_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.base_url, constants::DEFAULT_BASE_URL);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(
            config.refresh_interval,
            Duration::from_secs(constants::DEFAULT_REFRESH_INTERVAL_SECS)
        );
    }

    #[test]
    fn valid_values_are_applied() {
        let (_dir, path) = write_config(
            r#"
            [backend]
            base_url = "https://admin.example.org"
            timeout_secs = 30
            username = "admin"
            password = "opencast"

            [endpoints]
            series_stats = "/admin-ng/resources/series/stats.json"
            events_stats = ""

            [refresh]
            interval_secs = 60

            [table]
            page_size = 25

            [permissions.series]
            delete = "ROLE_ADMIN"

            [i18n]
            catalog = "/opt/i18n/de-DE.json"

            [logging]
            level = "debug"
            "#,
        );
        let (config, warnings) = load_config_file(&path);

        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.base_url, "https://admin.example.org");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.credentials,
            Some(("admin".to_string(), "opencast".to_string()))
        );
        assert_eq!(config.endpoints.events_stats, None);
        assert!(config.endpoints.series_stats.is_some());
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.permissions.series.delete, "ROLE_ADMIN");
        assert_eq!(config.permissions.series.view, constants::ROLE_SERIES_VIEW);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/opt/i18n/de-DE.json")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn out_of_range_values_fall_back_with_warnings() {
        let (_dir, path) = write_config(
            r#"
            [backend]
            base_url = "ftp://nope"
            timeout_secs = 0

            [refresh]
            interval_secs = 1

            [table]
            page_size = 10000

            [endpoints]
            events_delete = "/admin-ng/event/"

            [logging]
            level = "loud"
            "#,
        );
        let (config, warnings) = load_config_file(&path);

        assert_eq!(warnings.len(), 6, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("[refresh] interval_secs")));
        assert_eq!(config.base_url, constants::DEFAULT_BASE_URL);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert_eq!(
            config.endpoints.events_delete,
            constants::DEFAULT_EVENTS_DELETE_PATH
        );
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn unparseable_file_yields_defaults_and_one_warning() {
        let (_dir, path) = write_config("[backend\nbase_url = ");
        let (config, warnings) = load_config_file(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("parse"));
        assert_eq!(config.base_url, constants::DEFAULT_BASE_URL);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (_dir, path) = write_config("[future]\nflag = true\n[table]\npage_size = 5\n");
        let (config, warnings) = load_config_file(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn http_settings_carry_backend_values() {
        let config = AppConfig {
            base_url: "http://h:1".into(),
            ..AppConfig::default()
        };
        let settings = config.http_settings();
        assert_eq!(settings.base_url, "http://h:1");
        assert_eq!(settings.endpoints, Endpoints::default());
    }
}
